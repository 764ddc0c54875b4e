#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use sqlx::SqlitePool;

use course_studio::error::AppError;
use course_studio::models::CoursePayload;
use course_studio::platform::{
    PlatformClient, PlaybackCredential, ResourceUploadTarget, VideoUploadTarget,
};

/// Canned platform backend for tests: fixed responses, switchable failures,
/// call counters.
pub struct MockPlatform {
    pub issued_url: Option<String>,
    pub issued_video_id: Option<String>,
    pub put_response: String,
    pub fail_issuance: AtomicBool,
    pub fail_put: AtomicBool,
    pub fail_credential: AtomicBool,
    pub fail_save: AtomicBool,
    pub credential_calls: AtomicUsize,
    pub put_calls: AtomicUsize,
    pub saved: Mutex<Vec<CoursePayload>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            issued_url: None,
            issued_video_id: None,
            put_response: String::new(),
            fail_issuance: AtomicBool::new(false),
            fail_put: AtomicBool::new(false),
            fail_credential: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            credential_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
            saved: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    async fn resource_upload_target(
        &self,
        _filename: &str,
        _mime: &str,
    ) -> Result<ResourceUploadTarget, AppError> {
        if self.fail_issuance.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("no signed target".to_string()));
        }
        Ok(ResourceUploadTarget {
            upload_url: "https://uploads.test/slot".to_string(),
            url: self.issued_url.clone(),
        })
    }

    async fn video_upload_target(
        &self,
        _filename: &str,
        _mime: &str,
    ) -> Result<VideoUploadTarget, AppError> {
        if self.fail_issuance.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("no signed target".to_string()));
        }
        Ok(VideoUploadTarget {
            upload_url: "https://uploads.test/slot".to_string(),
            video_id: self.issued_video_id.clone(),
        })
    }

    async fn put_object(
        &self,
        _upload_url: &str,
        _bytes: Vec<u8>,
        _mime: &str,
    ) -> Result<String, AppError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("direct write rejected".to_string()));
        }
        Ok(self.put_response.clone())
    }

    async fn preview_credential(&self, _video_id: &str) -> Result<PlaybackCredential, AppError> {
        self.credential_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_credential.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("credential refused".to_string()));
        }
        Ok(PlaybackCredential {
            otp: "otp-123".to_string(),
            playback_info: "pb-456".to_string(),
        })
    }

    async fn save_course(&self, payload: &CoursePayload) -> Result<String, AppError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("save failed".to_string()));
        }
        self.saved.lock().unwrap().push(payload.clone());
        Ok("Saved".to_string())
    }
}

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::query(
        r#"
        CREATE TABLE drafts (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create drafts table");

    pool
}
