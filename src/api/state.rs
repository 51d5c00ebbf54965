use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::VerificationStore;
use crate::config::Config;
use crate::domain::KanbanError;
use crate::services::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: Option<SqlitePool>,
    pub mailer: Mailer,
    pub verification: Arc<VerificationStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: Option<SqlitePool>,
        mailer: Mailer,
        verification: Arc<VerificationStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            mailer,
            verification,
            config,
        }
    }

    pub fn require_db(&self) -> Result<&SqlitePool, KanbanError> {
        self.db
            .as_ref()
            .ok_or_else(|| KanbanError::Internal("Database not available".into()))
    }
}
