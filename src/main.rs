use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_studio::db::DraftStore;
use course_studio::platform::{PlatformConfig, PlatformHttpClient};
use course_studio::routes::router;
use course_studio::services::{AuthoringSession, UploadTracker};
use course_studio::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_studio=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://studio.db".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let config = PlatformConfig::new_from_env()?;
    let player = config.player();
    let platform = Arc::new(PlatformHttpClient::new(config)?);

    let draft_key =
        std::env::var("DRAFT_KEY").unwrap_or_else(|_| "course_builder_draft_v1".to_string());
    let store = DraftStore::new(pool.clone(), draft_key);
    let session = AuthoringSession::open(store).await?;

    let state = AppState {
        db: pool.clone(),
        platform,
        player,
        session: Arc::new(Mutex::new(session)),
        uploads: Arc::new(UploadTracker::default()),
    };

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
