//! Student-facing preview of the draft, including per-lecture access gating
//! for video content.

use serde::Serialize;
use tracing::warn;

use crate::models::{DraftRecord, Lecture, QuizQuestion, Resource, VideoRef};
use crate::platform::{PlatformClient, PlayerSettings};

/// What a student would see in place of a lecture's video. The gate only
/// talks to the backend for free-preview lectures with a resolved video;
/// locked content short-circuits client-side. Not a security boundary: the
/// backend refuses credentials for non-entitled viewers on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LecturePlayback {
    /// Nothing uploaded yet (or the upload is still pending reconciliation).
    NoVideo,
    /// Purchase required; no credential request is ever issued.
    Locked,
    /// Credential unavailable; stays a placeholder, never an error.
    Loading,
    Ready { src: String },
}

/// Resolves the playback surface for one lecture.
pub async fn lecture_playback(
    lecture: &Lecture,
    platform: &dyn PlatformClient,
    player: &PlayerSettings,
) -> LecturePlayback {
    let video_id = match &lecture.video {
        Some(VideoRef::Resolved(id)) => id,
        _ => return LecturePlayback::NoVideo,
    };

    if !lecture.is_free_preview {
        return LecturePlayback::Locked;
    }

    match platform.preview_credential(video_id).await {
        Ok(credential) => LecturePlayback::Ready {
            src: player.playback_src(&credential),
        },
        Err(e) => {
            warn!("preview credential unavailable for '{}': {}", video_id, e);
            LecturePlayback::Loading
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturePreview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub playback: LecturePlayback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPreview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<QuizQuestion>,
    pub lectures: Vec<LecturePreview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePreview {
    pub course_name: String,
    pub board: String,
    pub klass: String,
    pub subject: String,
    /// Up to four non-empty outcome bullets for the hero card.
    pub highlights: Vec<String>,
    pub price: f64,
    pub sections: Vec<SectionPreview>,
}

/// Builds the full student view of the current draft, resolving playback
/// per lecture through the access gate.
pub async fn course_preview(
    draft: &DraftRecord,
    platform: &dyn PlatformClient,
    player: &PlayerSettings,
) -> CoursePreview {
    let mut sections = Vec::with_capacity(draft.sections.len());
    for section in &draft.sections {
        let mut lectures = Vec::with_capacity(section.lectures.len());
        for lecture in &section.lectures {
            let playback = lecture_playback(lecture, platform, player).await;
            lectures.push(LecturePreview {
                title: lecture.title.clone(),
                description: lecture.description.clone(),
                playback,
                notes: lecture.notes.clone(),
                resources: lecture.resources.clone(),
                quiz: lecture.quiz.clone(),
            });
        }
        sections.push(SectionPreview {
            title: section.title.clone(),
            notes: section.notes.clone(),
            resources: section.resources.clone(),
            quiz: section.quiz.clone(),
            lectures,
        });
    }

    CoursePreview {
        course_name: draft.basics.course_name.clone(),
        board: draft.basics.board.clone(),
        klass: draft.basics.klass.clone(),
        subject: draft.basics.subject.clone(),
        highlights: draft
            .basics
            .outcome_bullets
            .iter()
            .filter(|b| !b.is_empty())
            .take(4)
            .cloned()
            .collect(),
        price: draft.pricing.price,
        sections,
    }
}
