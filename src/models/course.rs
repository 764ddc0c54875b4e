use serde::{Deserialize, Serialize};

use crate::models::QuizQuestion;

/// Step-1 metadata of the course being authored. Empty strings are valid
/// placeholders everywhere; nothing here is validated until publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    pub course_name: String,
    pub board: String,
    /// Class or level within the board (e.g. "10", "UG").
    pub klass: String,
    pub subject: String,
    #[serde(default)]
    pub language: String,
    /// Difficulty, e.g. "Beginner".
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub outcome_bullets: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllabus_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

impl Basics {
    pub fn starter() -> Self {
        Self {
            course_name: String::new(),
            board: String::new(),
            klass: String::new(),
            subject: String::new(),
            language: "EN".to_string(),
            level: String::new(),
            outcome_bullets: vec![String::new()],
            requirements: vec![String::new()],
            tags: Vec::new(),
            syllabus_ref: None,
            demo_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            price: 0.0,
            estimated_price: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Image,
    Link,
}

impl ResourceKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            ResourceKind::Image
        } else {
            ResourceKind::Document
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub url: String,
}

/// Provider-issued video identifier. `Pending` is the sentinel written when an
/// upload completed but neither response carried an id; it is never playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoRef {
    Pending,
    Resolved(String),
}

pub const PENDING_VIDEO_REF: &str = "PENDING";

impl VideoRef {
    pub fn is_resolved(&self) -> bool {
        matches!(self, VideoRef::Resolved(_))
    }
}

impl From<String> for VideoRef {
    fn from(value: String) -> Self {
        if value == PENDING_VIDEO_REF {
            VideoRef::Pending
        } else {
            VideoRef::Resolved(value)
        }
    }
}

impl From<VideoRef> for String {
    fn from(value: VideoRef) -> Self {
        match value {
            VideoRef::Pending => PENDING_VIDEO_REF.to_string(),
            VideoRef::Resolved(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub is_free_preview: bool,
    #[serde(default)]
    pub allow_doubts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u32>,
}

impl Lecture {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(String::new()),
            video: None,
            notes: None,
            resources: Vec::new(),
            quiz: Vec::new(),
            is_free_preview: false,
            allow_doubts: false,
            duration_sec: None,
        }
    }

    pub fn has_resolved_video(&self) -> bool {
        self.video.as_ref().is_some_and(VideoRef::is_resolved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub allow_doubts: bool,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

impl Section {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: None,
            resources: Vec::new(),
            quiz: Vec::new(),
            allow_doubts: false,
            lectures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Draft,
    Published,
}

/// The triple written to durable draft storage. Exactly these three fields;
/// session state like the wizard step or the publish status never persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub basics: Basics,
    pub sections: Vec<Section>,
    pub pricing: Pricing,
}

impl DraftRecord {
    /// Seed document for a brand-new session: one section with one lecture.
    pub fn starter() -> Self {
        let mut section = Section::titled("Section 1");
        section.lectures.push(Lecture::titled("Lecture 1"));
        Self {
            basics: Basics::starter(),
            sections: vec![section],
            pricing: Pricing::default(),
        }
    }
}

/// Full serialized draft sent to the platform on save or publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePayload {
    pub basics: Basics,
    pub sections: Vec<Section>,
    pub pricing: Pricing,
    pub status: CourseStatus,
}
