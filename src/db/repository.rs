use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::DraftRecord;

/// Durable draft storage: one JSON blob per storage key, last write wins.
/// Constructed explicitly with its key so tests can point separate stores
/// at isolated slots of the same database.
#[derive(Clone)]
pub struct DraftStore {
    db: SqlitePool,
    key: String,
}

impl DraftStore {
    pub fn new(db: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    /// A store under a freshly generated key, for isolated test storage.
    pub fn isolated(db: SqlitePool) -> Self {
        Self::new(db, format!("draft-{}", Uuid::new_v4()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored triple. A missing row and an unreadable blob both
    /// come back as `None`; the session then starts from the seed document.
    pub async fn load(&self) -> Result<Option<DraftRecord>, AppError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM drafts WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.db)
            .await?;

        let Some((value,)) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<DraftRecord>(&value) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!("stored draft under '{}' is unreadable, starting fresh: {}", self.key, e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, draft: &DraftRecord) -> Result<(), AppError> {
        let value = serde_json::to_string(draft)?;
        let saved_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO drafts (key, value, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, saved_at = excluded.saved_at
            "#,
        )
        .bind(&self.key)
        .bind(&value)
        .bind(&saved_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM drafts WHERE key = ?")
            .bind(&self.key)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
