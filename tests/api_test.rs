mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use course_studio::db::DraftStore;
use course_studio::platform::PlayerSettings;
use course_studio::routes::router;
use course_studio::services::{AuthoringSession, UploadTracker};
use course_studio::state::AppState;

use common::{MockPlatform, test_pool};

async fn app(platform: Arc<MockPlatform>) -> Router {
    let pool = test_pool().await;
    let session = AuthoringSession::open(DraftStore::isolated(pool.clone()))
        .await
        .expect("open failed");

    router(AppState {
        db: pool,
        platform,
        player: PlayerSettings {
            base_url: "https://player.test/v2/".to_string(),
            player_id: "player-9".to_string(),
        },
        session: Arc::new(Mutex::new(session)),
        uploads: Arc::new(UploadTracker::default()),
    })
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request build failed")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    serde_json::from_slice(&bytes).expect("body is not json")
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn draft_starts_from_the_seed_document() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .oneshot(Request::builder().uri("/draft").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["step"], "basics");
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["sections"][0]["title"], "Section 1");
    assert_eq!(body["sections"][0]["lectures"][0]["title"], "Lecture 1");
    assert_eq!(body["uploading"], serde_json::json!([]));
}

#[tokio::test]
async fn sections_can_be_added_and_moved_over_http() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/draft/sections", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sections"].as_array().unwrap().len(), 2);
    assert_eq!(body["sections"][1]["title"], "Section 2");

    let response = app
        .oneshot(json_request(
            "POST",
            "/draft/sections/1/move",
            r#"{"direction":"up"}"#,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["sections"][0]["title"], "Section 2");
    assert_eq!(body["sections"][1]["title"], "Section 1");
}

#[tokio::test]
async fn step_navigation_over_http() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/session/step", r#"{"step":"pricing"}"#))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["step"], "pricing");

    let response = app
        .oneshot(json_request("POST", "/session/next", "{}"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["step"], "preview");
}

#[tokio::test]
async fn link_resources_require_title_and_url() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/draft/sections/0/resources",
            r#"{"title":"","url":"https://notes.test"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/draft/sections/0/resources",
            r#"{"title":"Syllabus","url":"https://notes.test"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sections"][0]["resources"][0]["type"], "link");
}

#[tokio::test]
async fn video_upload_sets_the_resolved_reference() {
    let platform = Arc::new(MockPlatform {
        issued_video_id: Some("vid-42".to_string()),
        ..MockPlatform::default()
    });
    let app = app(platform).await;

    let request = Request::builder()
        .method("POST")
        .uri("/draft/sections/0/lectures/0/video?filename=intro.mp4&mime=video/mp4")
        .body(Body::from(vec![1u8, 2, 3]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["sections"][0]["lectures"][0]["videoId"], "vid-42");
    assert_eq!(body["uploading"], serde_json::json!([]));
}

#[tokio::test]
async fn video_upload_to_a_missing_lecture_is_not_found() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let request = Request::builder()
        .method("POST")
        .uri("/draft/sections/0/lectures/9/video?filename=intro.mp4")
        .body(Body::from(Vec::<u8>::new()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn publish_reports_violations_as_unprocessable() {
    let app = app(Arc::new(MockPlatform::default())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/publish", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["violations"][0], "Course name required");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/publish/checks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["ready"], false);
    assert!(!body["violations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn save_draft_succeeds_despite_violations() {
    let platform = Arc::new(MockPlatform::default());
    let app = app(platform.clone()).await;

    let response = app
        .oneshot(json_request("POST", "/draft/save", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Saved");
    assert_eq!(platform.saved.lock().unwrap().len(), 1);
}
