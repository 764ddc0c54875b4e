use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::platform::{PlatformClient, PlayerSettings};
use crate::services::{AuthoringSession, UploadTracker};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub platform: Arc<dyn PlatformClient>,
    pub player: PlayerSettings,
    pub session: Arc<Mutex<AuthoringSession>>,
    pub uploads: Arc<UploadTracker>,
}
