pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;
use crate::models::CoursePayload;

pub use dto::{PlaybackCredential, ResourceUploadTarget, VideoUploadTarget};

#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub api_base: String,
    pub player_base: String,
    pub player_id: String,
}

impl PlatformConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_base = env::var("PLATFORM_API_URL")
            .map_err(|_| AppError::BadRequest("PLATFORM_API_URL is not set".to_string()))?;
        let player_base = env::var("VIDEO_PLAYER_URL")
            .unwrap_or_else(|_| "https://player.vdocipher.com/v2/".to_string());
        let player_id = env::var("VIDEO_PLAYER_ID").unwrap_or_else(|_| "default".to_string());

        Ok(Self {
            api_base,
            player_base,
            player_id,
        })
    }

    pub fn player(&self) -> PlayerSettings {
        PlayerSettings {
            base_url: self.player_base.clone(),
            player_id: self.player_id.clone(),
        }
    }
}

/// Where playback surfaces are hosted and which configured player renders
/// them. Combined with a credential this yields an embeddable source URL.
#[derive(Clone, Debug)]
pub struct PlayerSettings {
    pub base_url: String,
    pub player_id: String,
}

impl PlayerSettings {
    pub fn playback_src(&self, credential: &PlaybackCredential) -> String {
        format!(
            "{}?otp={}&playbackInfo={}&player={}",
            self.base_url, credential.otp, credential.playback_info, self.player_id
        )
    }
}

/// The platform backend: signed-upload issuance, direct object writes,
/// preview playback credentials and course save/publish.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn resource_upload_target(
        &self,
        filename: &str,
        mime: &str,
    ) -> Result<ResourceUploadTarget, AppError>;

    async fn video_upload_target(
        &self,
        filename: &str,
        mime: &str,
    ) -> Result<VideoUploadTarget, AppError>;

    /// Direct write of the raw bytes to a previously issued signed target.
    /// Returns the response body for identifier scraping.
    async fn put_object(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, AppError>;

    async fn preview_credential(&self, video_id: &str) -> Result<PlaybackCredential, AppError>;

    /// Sends the full serialized draft; returns the backend's message.
    async fn save_course(&self, payload: &CoursePayload) -> Result<String, AppError>;
}

pub struct PlatformHttpClient {
    client: Client,
    config: PlatformConfig,
}

impl PlatformHttpClient {
    pub fn new(config: PlatformConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn post_upload_url<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        filename: &str,
        mime: &str,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.config.api_base, endpoint);
        let request_body = dto::UploadUrlRequest { filename, mime };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("upload-url request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "upload-url error {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse upload-url response: {}", e)))
    }
}

#[async_trait]
impl PlatformClient for PlatformHttpClient {
    async fn resource_upload_target(
        &self,
        filename: &str,
        mime: &str,
    ) -> Result<ResourceUploadTarget, AppError> {
        self.post_upload_url("/admin/resource/upload-url", filename, mime)
            .await
    }

    async fn video_upload_target(
        &self,
        filename: &str,
        mime: &str,
    ) -> Result<VideoUploadTarget, AppError> {
        self.post_upload_url("/admin/video/upload-url", filename, mime)
            .await
    }

    async fn put_object(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, AppError> {
        let response = self
            .client
            .put(upload_url)
            .header("Content-Type", mime)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("direct write failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "direct write rejected {}: {}",
                status, body
            )));
        }

        Ok(response.text().await.unwrap_or_default())
    }

    async fn preview_credential(&self, video_id: &str) -> Result<PlaybackCredential, AppError> {
        let url = format!("{}/video/otp", self.config.api_base);
        let request_body = dto::PlaybackRequest {
            video_id,
            preview: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("playback credential request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "playback credential error {}: {}",
                status, body
            )));
        }

        response.json::<PlaybackCredential>().await.map_err(|e| {
            AppError::Upstream(format!("Failed to parse playback credential: {}", e))
        })
    }

    async fn save_course(&self, payload: &CoursePayload) -> Result<String, AppError> {
        let url = format!("{}/course/instructor/create", self.config.api_base);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("course save request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "course save error {}: {}",
                status, body
            )));
        }

        let parsed = response
            .json::<dto::SaveCourseResponse>()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse save response: {}", e)))?;

        if !parsed.success {
            return Err(AppError::Upstream(
                parsed.message.unwrap_or_else(|| "Save failed".to_string()),
            ));
        }

        Ok(parsed.message.unwrap_or_else(|| "Saved".to_string()))
    }
}
