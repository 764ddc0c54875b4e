use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct UploadUrlRequest<'a> {
    pub filename: &'a str,
    pub mime: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUploadTarget {
    pub upload_url: String,
    /// Final public URL, when the backend resolves it up front.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUploadTarget {
    pub upload_url: String,
    /// Provider video id, when issued immediately.
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRequest<'a> {
    pub video_id: &'a str,
    pub preview: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCredential {
    pub otp: String,
    pub playback_info: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveCourseResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
