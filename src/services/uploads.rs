//! Two-phase upload orchestration against the platform backend.
//!
//! Both protocols share the same shape: request a signed write target, PUT
//! the raw bytes to it, then resolve an identifier (a public URL for
//! resources, a provider video id for videos) from whichever response
//! carried it. A failure in either phase leaves the document untouched; the
//! caller retries by invoking the upload again.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex};

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::VideoRef;
use crate::platform::PlatformClient;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"]+"#).unwrap());

// Best-effort fallback for backends that only echo the id inside the direct
// write response. The structured `videoId` field always wins when present.
static VIDEO_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"videoId":"([^"]+)"#).unwrap());

pub fn scrape_url(body: &str) -> Option<String> {
    URL_PATTERN.find(body).map(|m| m.as_str().to_string())
}

pub fn scrape_video_id(body: &str) -> Option<String> {
    VIDEO_ID_PATTERN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct ResourceUploader {
    platform: Arc<dyn PlatformClient>,
}

impl ResourceUploader {
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        Self { platform }
    }

    /// Runs the two-phase protocol and returns the final accessible URL.
    pub async fn upload(
        &self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let target = self
            .platform
            .resource_upload_target(filename, mime)
            .await
            .map_err(|e| {
                warn!("resource upload-url issuance failed: {}", e);
                AppError::UploadFailed("Resource upload failed".to_string())
            })?;

        let body = self
            .platform
            .put_object(&target.upload_url, bytes, mime)
            .await
            .map_err(|e| {
                warn!("resource direct write failed: {}", e);
                AppError::UploadFailed("Resource upload failed".to_string())
            })?;

        target
            .url
            .or_else(|| scrape_url(&body))
            .ok_or_else(|| AppError::UploadFailed("Resource URL not returned".to_string()))
    }
}

pub struct VideoUploader {
    platform: Arc<dyn PlatformClient>,
}

impl VideoUploader {
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        Self { platform }
    }

    /// Runs the two-phase protocol for a lecture video. An upload whose id
    /// cannot be resolved from either response still succeeds, yielding the
    /// pending sentinel for later reconciliation.
    pub async fn upload(
        &self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<VideoRef, AppError> {
        let target = self
            .platform
            .video_upload_target(filename, mime)
            .await
            .map_err(|e| {
                warn!("video upload-url issuance failed: {}", e);
                AppError::UploadFailed("Video upload failed".to_string())
            })?;

        let body = self
            .platform
            .put_object(&target.upload_url, bytes, mime)
            .await
            .map_err(|e| {
                warn!("video direct write failed: {}", e);
                AppError::UploadFailed("Video upload failed".to_string())
            })?;

        match target.video_id.or_else(|| scrape_video_id(&body)) {
            Some(id) => Ok(VideoRef::Resolved(id)),
            None => {
                warn!("video id not resolved for '{}', marking pending", filename);
                Ok(VideoRef::Pending)
            }
        }
    }
}

/// Addresses a lecture by position in the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturePath {
    pub section: usize,
    pub lecture: usize,
}

/// Transient upload-in-progress state, kept out of the persisted document so
/// a stuck flag can never outlive the process. One entry per lecture; there
/// is no global lock, so unrelated lectures upload concurrently.
#[derive(Default)]
pub struct UploadTracker {
    active: Mutex<HashSet<LecturePath>>,
}

impl UploadTracker {
    /// Registers an in-flight upload. Returns false when that lecture
    /// already has one, in which case the caller must not start another.
    pub fn begin(&self, path: LecturePath) -> bool {
        self.active.lock().unwrap().insert(path)
    }

    pub fn finish(&self, path: LecturePath) {
        self.active.lock().unwrap().remove(&path);
    }

    pub fn is_active(&self, path: LecturePath) -> bool {
        self.active.lock().unwrap().contains(&path)
    }

    pub fn active_paths(&self) -> Vec<LecturePath> {
        let mut paths: Vec<_> = self.active.lock().unwrap().iter().copied().collect();
        paths.sort_by_key(|p| (p.section, p.lecture));
        paths
    }
}
