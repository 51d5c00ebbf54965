use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::domain::{KanbanError, SessionUser};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Public user lookup by id or email. Only non-credential fields leave
/// the server.
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SessionUser>, KanbanError> {
    let db = state.require_db()?;

    let row: Option<(String, String, String)> = match (&query.id, &query.email) {
        (Some(id), _) => {
            sqlx::query_as("SELECT id, name, email FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        (None, Some(email)) => {
            sqlx::query_as("SELECT id, name, email FROM users WHERE email = ?")
                .bind(email.to_lowercase())
                .fetch_optional(db)
                .await?
        }
        (None, None) => {
            return Err(KanbanError::BadRequest("id or email is required".into()));
        }
    };

    let (id, name, email) = row.ok_or_else(|| KanbanError::NotFound("User not found".into()))?;

    Ok(Json(SessionUser { id, name, email }))
}
