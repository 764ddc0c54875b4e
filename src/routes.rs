use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, patch, post, put};
use axum::{Router, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::curriculum::{self, Move, quiz::QuizHost};
use crate::error::AppError;
use crate::models::{
    Basics, CourseStatus, Pricing, QuestionPatch, Resource, ResourceKind, Section,
};
use crate::preview::{self, CoursePreview};
use crate::services::{AuthoringSession, LecturePath, ResourceUploader, UploadTracker, VideoUploader, WizardStep};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session_info))
        .route("/session/step", post(goto_step))
        .route("/session/next", post(next_step))
        .route("/session/back", post(back_step))
        .route("/draft", get(get_draft))
        .route("/draft/reset", post(reset_draft))
        .route("/draft/save", post(save_draft))
        .route("/publish", post(publish_course))
        .route("/publish/checks", get(publish_checks_view))
        .route("/preview", get(preview_course))
        .route("/draft/basics", put(set_basics))
        .route("/draft/basics/outcomes", post(add_outcome))
        .route("/draft/basics/outcomes/{i}", put(set_outcome).delete(remove_outcome))
        .route("/draft/basics/requirements", post(add_requirement))
        .route(
            "/draft/basics/requirements/{i}",
            put(set_requirement).delete(remove_requirement),
        )
        .route("/draft/pricing", put(set_pricing))
        .route("/draft/sections", post(add_section))
        .route("/draft/sections/{si}", patch(patch_section).delete(remove_section))
        .route("/draft/sections/{si}/move", post(move_section))
        .route("/draft/sections/{si}/resources", post(add_section_link))
        .route("/draft/sections/{si}/resources/upload", post(upload_section_resource))
        .route("/draft/sections/{si}/resources/{ri}", delete(remove_section_resource))
        .route("/draft/sections/{si}/quiz", post(add_section_question))
        .route(
            "/draft/sections/{si}/quiz/{qi}",
            patch(patch_section_question).delete(remove_section_question),
        )
        .route("/draft/sections/{si}/quiz/{qi}/options", post(add_section_option))
        .route(
            "/draft/sections/{si}/quiz/{qi}/options/{oi}",
            put(set_section_option).delete(remove_section_option),
        )
        .route("/draft/sections/{si}/lectures", post(add_lecture))
        .route(
            "/draft/sections/{si}/lectures/{li}",
            patch(patch_lecture).delete(remove_lecture),
        )
        .route("/draft/sections/{si}/lectures/{li}/move", post(move_lecture))
        .route("/draft/sections/{si}/lectures/{li}/video", post(upload_lecture_video))
        .route("/draft/sections/{si}/lectures/{li}/resources", post(add_lecture_link))
        .route(
            "/draft/sections/{si}/lectures/{li}/resources/upload",
            post(upload_lecture_resource),
        )
        .route(
            "/draft/sections/{si}/lectures/{li}/resources/{ri}",
            delete(remove_lecture_resource),
        )
        .route("/draft/sections/{si}/lectures/{li}/quiz", post(add_lecture_question))
        .route(
            "/draft/sections/{si}/lectures/{li}/quiz/{qi}",
            patch(patch_lecture_question).delete(remove_lecture_question),
        )
        .route(
            "/draft/sections/{si}/lectures/{li}/quiz/{qi}/options",
            post(add_lecture_option),
        )
        .route(
            "/draft/sections/{si}/lectures/{li}/quiz/{qi}/options/{oi}",
            put(set_lecture_option).delete(remove_lecture_option),
        )
        .with_state(state)
}

/* ===== view models ===== */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftView {
    step: WizardStep,
    status: CourseStatus,
    basics: Basics,
    sections: Vec<Section>,
    pricing: Pricing,
    /// Lectures with an upload currently in flight (transient, not persisted).
    uploading: Vec<LecturePath>,
}

fn draft_view(session: &AuthoringSession, uploads: &UploadTracker) -> DraftView {
    DraftView {
        step: session.step(),
        status: session.status(),
        basics: session.basics().clone(),
        sections: session.sections().to_vec(),
        pricing: session.pricing().clone(),
        uploading: uploads.active_paths(),
    }
}

#[derive(Serialize)]
struct SessionView {
    step: WizardStep,
    status: CourseStatus,
}

#[derive(Serialize)]
struct ChecksView {
    ready: bool,
    violations: Vec<String>,
}

#[derive(Serialize)]
struct SaveView {
    message: String,
}

/* ===== request bodies ===== */

#[derive(Deserialize)]
struct StepRequest {
    step: WizardStep,
}

#[derive(Deserialize)]
struct MoveRequest {
    direction: Move,
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionPatch {
    title: Option<String>,
    notes: Option<String>,
    allow_doubts: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LecturePatch {
    title: Option<String>,
    description: Option<String>,
    notes: Option<String>,
    is_free_preview: Option<bool>,
    allow_doubts: Option<bool>,
    duration_sec: Option<u32>,
}

#[derive(Deserialize)]
struct LinkRequest {
    title: String,
    url: String,
}

#[derive(Deserialize)]
struct UploadParams {
    filename: String,
    #[serde(default)]
    mime: String,
    #[serde(default)]
    title: Option<String>,
}

/* ===== health & session ===== */

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn session_info(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView {
        step: session.step(),
        status: session.status(),
    })
}

async fn goto_step(
    State(state): State<AppState>,
    Json(req): Json<StepRequest>,
) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.goto(req.step);
    Json(SessionView {
        step: session.step(),
        status: session.status(),
    })
}

async fn next_step(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.advance();
    Json(SessionView {
        step: session.step(),
        status: session.status(),
    })
}

async fn back_step(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.retreat();
    Json(SessionView {
        step: session.step(),
        status: session.status(),
    })
}

/* ===== draft lifecycle ===== */

async fn get_draft(State(state): State<AppState>) -> Json<DraftView> {
    let session = state.session.lock().await;
    Json(draft_view(&session, &state.uploads))
}

async fn reset_draft(State(state): State<AppState>) -> Result<Json<DraftView>, AppError> {
    let mut session = state.session.lock().await;
    session.reset().await?;
    Ok(Json(draft_view(&session, &state.uploads)))
}

async fn save_draft(State(state): State<AppState>) -> Result<Json<SaveView>, AppError> {
    let session = state.session.lock().await;
    let message = session.save_draft(state.platform.as_ref()).await?;
    Ok(Json(SaveView { message }))
}

async fn publish_course(State(state): State<AppState>) -> Result<Json<SaveView>, AppError> {
    let mut session = state.session.lock().await;
    let message = session.publish(state.platform.as_ref()).await?;
    Ok(Json(SaveView { message }))
}

async fn publish_checks_view(State(state): State<AppState>) -> Json<ChecksView> {
    let session = state.session.lock().await;
    let violations = session.publish_violations();
    Json(ChecksView {
        ready: violations.is_empty(),
        violations,
    })
}

async fn preview_course(State(state): State<AppState>) -> Json<CoursePreview> {
    // Snapshot under the lock, fetch credentials outside it.
    let draft = {
        let session = state.session.lock().await;
        session.snapshot()
    };
    let view = preview::course_preview(&draft, state.platform.as_ref(), &state.player).await;
    Json(view)
}

/* ===== basics & pricing ===== */

async fn set_basics(
    State(state): State<AppState>,
    Json(basics): Json<Basics>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.set_basics(basics);
    Json(draft_view(&session, &state.uploads))
}

async fn add_outcome(State(state): State<AppState>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(curriculum::add_outcome);
    Json(draft_view(&session, &state.uploads))
}

async fn set_outcome(
    State(state): State<AppState>,
    Path(i): Path<usize>,
    Json(req): Json<TextRequest>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(|b| curriculum::set_outcome(b, i, &req.text));
    Json(draft_view(&session, &state.uploads))
}

async fn remove_outcome(State(state): State<AppState>, Path(i): Path<usize>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(|b| curriculum::remove_outcome(b, i));
    Json(draft_view(&session, &state.uploads))
}

async fn add_requirement(State(state): State<AppState>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(curriculum::add_requirement);
    Json(draft_view(&session, &state.uploads))
}

async fn set_requirement(
    State(state): State<AppState>,
    Path(i): Path<usize>,
    Json(req): Json<TextRequest>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(|b| curriculum::set_requirement(b, i, &req.text));
    Json(draft_view(&session, &state.uploads))
}

async fn remove_requirement(
    State(state): State<AppState>,
    Path(i): Path<usize>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_basics(|b| curriculum::remove_requirement(b, i));
    Json(draft_view(&session, &state.uploads))
}

async fn set_pricing(
    State(state): State<AppState>,
    Json(pricing): Json<Pricing>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.set_pricing(pricing);
    Json(draft_view(&session, &state.uploads))
}

/* ===== sections ===== */

async fn add_section(State(state): State<AppState>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(curriculum::add_section);
    Json(draft_view(&session, &state.uploads))
}

async fn patch_section(
    State(state): State<AppState>,
    Path(si): Path<usize>,
    Json(req): Json<SectionPatch>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    if let Some(title) = req.title {
        session.update_sections(|s| curriculum::rename_section(s, si, &title));
    }
    if let Some(notes) = req.notes {
        session.update_sections(|s| curriculum::set_section_notes(s, si, &notes));
    }
    if let Some(allow) = req.allow_doubts {
        session.update_sections(|s| curriculum::set_section_doubts(s, si, allow));
    }
    Json(draft_view(&session, &state.uploads))
}

async fn remove_section(State(state): State<AppState>, Path(si): Path<usize>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::remove_section(s, si));
    Json(draft_view(&session, &state.uploads))
}

async fn move_section(
    State(state): State<AppState>,
    Path(si): Path<usize>,
    Json(req): Json<MoveRequest>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::move_section(s, si, req.direction));
    Json(draft_view(&session, &state.uploads))
}

/* ===== lectures ===== */

async fn add_lecture(State(state): State<AppState>, Path(si): Path<usize>) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::add_lecture(s, si));
    Json(draft_view(&session, &state.uploads))
}

async fn patch_lecture(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
    Json(req): Json<LecturePatch>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    if let Some(title) = req.title {
        session.update_sections(|s| curriculum::rename_lecture(s, si, li, &title));
    }
    if let Some(description) = req.description {
        session.update_sections(|s| curriculum::set_lecture_description(s, si, li, &description));
    }
    if let Some(notes) = req.notes {
        session.update_sections(|s| curriculum::set_lecture_notes(s, si, li, &notes));
    }
    if let Some(on) = req.is_free_preview {
        session.update_sections(|s| curriculum::set_lecture_preview(s, si, li, on));
    }
    if let Some(allow) = req.allow_doubts {
        session.update_sections(|s| curriculum::set_lecture_doubts(s, si, li, allow));
    }
    if let Some(duration) = req.duration_sec {
        session.update_sections(|s| curriculum::set_lecture_duration(s, si, li, Some(duration)));
    }
    Json(draft_view(&session, &state.uploads))
}

async fn remove_lecture(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::remove_lecture(s, si, li));
    Json(draft_view(&session, &state.uploads))
}

async fn move_lecture(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
    Json(req): Json<MoveRequest>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::move_lecture(s, si, li, req.direction));
    Json(draft_view(&session, &state.uploads))
}

/* ===== resources ===== */

fn link_resource(req: LinkRequest) -> Result<Resource, AppError> {
    if req.title.trim().is_empty() || req.url.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Resource title and URL required".to_string(),
        ));
    }
    Ok(Resource {
        title: req.title,
        kind: ResourceKind::Link,
        url: req.url,
    })
}

async fn add_section_link(
    State(state): State<AppState>,
    Path(si): Path<usize>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<DraftView>, AppError> {
    let resource = link_resource(req)?;
    let mut session = state.session.lock().await;
    if session.sections().get(si).is_none() {
        return Err(AppError::NotFound);
    }
    session.update_sections(|s| curriculum::push_section_resource(s, si, resource));
    Ok(Json(draft_view(&session, &state.uploads)))
}

async fn upload_section_resource(
    State(state): State<AppState>,
    Path(si): Path<usize>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<DraftView>, AppError> {
    {
        let session = state.session.lock().await;
        if session.sections().get(si).is_none() {
            return Err(AppError::NotFound);
        }
    }

    let uploader = ResourceUploader::new(state.platform.clone());
    let url = uploader
        .upload(&params.filename, &params.mime, body.to_vec())
        .await?;

    let resource = Resource {
        title: params.title.unwrap_or_else(|| params.filename.clone()),
        kind: ResourceKind::from_mime(&params.mime),
        url,
    };

    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::push_section_resource(s, si, resource));
    Ok(Json(draft_view(&session, &state.uploads)))
}

async fn remove_section_resource(
    State(state): State<AppState>,
    Path((si, ri)): Path<(usize, usize)>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::remove_section_resource(s, si, ri));
    Json(draft_view(&session, &state.uploads))
}

async fn add_lecture_link(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<DraftView>, AppError> {
    let resource = link_resource(req)?;
    let mut session = state.session.lock().await;
    if lecture_missing(&session, si, li) {
        return Err(AppError::NotFound);
    }
    session.update_sections(|s| curriculum::push_lecture_resource(s, si, li, resource));
    Ok(Json(draft_view(&session, &state.uploads)))
}

async fn upload_lecture_resource(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<DraftView>, AppError> {
    {
        let session = state.session.lock().await;
        if lecture_missing(&session, si, li) {
            return Err(AppError::NotFound);
        }
    }

    let uploader = ResourceUploader::new(state.platform.clone());
    let url = uploader
        .upload(&params.filename, &params.mime, body.to_vec())
        .await?;

    let resource = Resource {
        title: params.title.unwrap_or_else(|| params.filename.clone()),
        kind: ResourceKind::from_mime(&params.mime),
        url,
    };

    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::push_lecture_resource(s, si, li, resource));
    Ok(Json(draft_view(&session, &state.uploads)))
}

async fn remove_lecture_resource(
    State(state): State<AppState>,
    Path((si, li, ri)): Path<(usize, usize, usize)>,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::remove_lecture_resource(s, si, li, ri));
    Json(draft_view(&session, &state.uploads))
}

fn lecture_missing(session: &AuthoringSession, si: usize, li: usize) -> bool {
    session
        .sections()
        .get(si)
        .and_then(|s| s.lectures.get(li))
        .is_none()
}

/* ===== video upload ===== */

async fn upload_lecture_video(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<DraftView>, AppError> {
    {
        let session = state.session.lock().await;
        if lecture_missing(&session, si, li) {
            return Err(AppError::NotFound);
        }
    }

    let mime = if params.mime.is_empty() {
        "video/mp4".to_string()
    } else {
        params.mime
    };

    let path = LecturePath {
        section: si,
        lecture: li,
    };
    if !state.uploads.begin(path) {
        return Err(AppError::Conflict(
            "Video upload already in progress for this lecture".to_string(),
        ));
    }

    let uploader = VideoUploader::new(state.platform.clone());
    let result = uploader.upload(&params.filename, &mime, body.to_vec()).await;
    state.uploads.finish(path);
    let video = result?;

    // If the lecture was removed mid-upload the write lands out of range
    // and the completed upload is simply dropped.
    let mut session = state.session.lock().await;
    session.update_sections(move |s| curriculum::set_lecture_video(s, si, li, video));
    Ok(Json(draft_view(&session, &state.uploads)))
}

/* ===== quiz ===== */

async fn add_section_question(
    State(state): State<AppState>,
    Path(si): Path<usize>,
) -> Json<DraftView> {
    add_question(state, QuizHost::Section(si)).await
}

async fn add_lecture_question(
    State(state): State<AppState>,
    Path((si, li)): Path<(usize, usize)>,
) -> Json<DraftView> {
    add_question(state, QuizHost::Lecture(si, li)).await
}

async fn add_question(state: AppState, host: QuizHost) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::add_question(s, host));
    Json(draft_view(&session, &state.uploads))
}

async fn patch_section_question(
    State(state): State<AppState>,
    Path((si, qi)): Path<(usize, usize)>,
    Json(req): Json<QuestionPatch>,
) -> Json<DraftView> {
    patch_question(state, QuizHost::Section(si), qi, req).await
}

async fn patch_lecture_question(
    State(state): State<AppState>,
    Path((si, li, qi)): Path<(usize, usize, usize)>,
    Json(req): Json<QuestionPatch>,
) -> Json<DraftView> {
    patch_question(state, QuizHost::Lecture(si, li), qi, req).await
}

async fn patch_question(
    state: AppState,
    host: QuizHost,
    qi: usize,
    patch: QuestionPatch,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::edit_question(s, host, qi, patch));
    Json(draft_view(&session, &state.uploads))
}

async fn remove_section_question(
    State(state): State<AppState>,
    Path((si, qi)): Path<(usize, usize)>,
) -> Json<DraftView> {
    remove_question(state, QuizHost::Section(si), qi).await
}

async fn remove_lecture_question(
    State(state): State<AppState>,
    Path((si, li, qi)): Path<(usize, usize, usize)>,
) -> Json<DraftView> {
    remove_question(state, QuizHost::Lecture(si, li), qi).await
}

async fn remove_question(state: AppState, host: QuizHost, qi: usize) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::remove_question(s, host, qi));
    Json(draft_view(&session, &state.uploads))
}

async fn add_section_option(
    State(state): State<AppState>,
    Path((si, qi)): Path<(usize, usize)>,
) -> Json<DraftView> {
    add_option(state, QuizHost::Section(si), qi).await
}

async fn add_lecture_option(
    State(state): State<AppState>,
    Path((si, li, qi)): Path<(usize, usize, usize)>,
) -> Json<DraftView> {
    add_option(state, QuizHost::Lecture(si, li), qi).await
}

async fn add_option(state: AppState, host: QuizHost, qi: usize) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::add_option(s, host, qi));
    Json(draft_view(&session, &state.uploads))
}

async fn set_section_option(
    State(state): State<AppState>,
    Path((si, qi, oi)): Path<(usize, usize, usize)>,
    Json(req): Json<TextRequest>,
) -> Json<DraftView> {
    set_option(state, QuizHost::Section(si), qi, oi, req.text).await
}

async fn set_lecture_option(
    State(state): State<AppState>,
    Path((si, li, qi, oi)): Path<(usize, usize, usize, usize)>,
    Json(req): Json<TextRequest>,
) -> Json<DraftView> {
    set_option(state, QuizHost::Lecture(si, li), qi, oi, req.text).await
}

async fn set_option(
    state: AppState,
    host: QuizHost,
    qi: usize,
    oi: usize,
    text: String,
) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::set_option(s, host, qi, oi, &text));
    Json(draft_view(&session, &state.uploads))
}

async fn remove_section_option(
    State(state): State<AppState>,
    Path((si, qi, oi)): Path<(usize, usize, usize)>,
) -> Json<DraftView> {
    remove_option(state, QuizHost::Section(si), qi, oi).await
}

async fn remove_lecture_option(
    State(state): State<AppState>,
    Path((si, li, qi, oi)): Path<(usize, usize, usize, usize)>,
) -> Json<DraftView> {
    remove_option(state, QuizHost::Lecture(si, li), qi, oi).await
}

async fn remove_option(state: AppState, host: QuizHost, qi: usize, oi: usize) -> Json<DraftView> {
    let mut session = state.session.lock().await;
    session.update_sections(|s| curriculum::quiz::remove_option(s, host, qi, oi));
    Json(draft_view(&session, &state.uploads))
}
