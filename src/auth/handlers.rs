use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::auth::{password, TokenError};
use crate::domain::user::normalize_email;
use crate::domain::{KanbanError, SessionUser, User};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifiedQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), KanbanError> {
    let db = state.require_db()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(KanbanError::BadRequest("Name must not be empty".into()));
    }
    if req.password.len() < 6 {
        return Err(KanbanError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }
    let email = normalize_email(&req.email).map_err(KanbanError::BadRequest)?;

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(db)
        .await?;
    if existing.is_some() {
        return Err(KanbanError::BadRequest(
            "This email is already registered".into(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let password_hash = password::hash_password(&req.password)
        .map_err(|e| KanbanError::Internal(format!("Failed to hash password: {}", e)))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, email_verified, created_at) VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(&now)
    .execute(db)
    .await?;

    // Verification email is fire-and-forget.
    let token = state.verification.issue(&email);
    let mailer = state.mailer.clone();
    let email_for_task = email.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&email_for_task, &token).await {
            tracing::warn!("Failed to send verification email: {}", e);
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: SessionUser {
                id,
                name: name.to_string(),
                email,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, KanbanError> {
    let db = state.require_db()?;
    let email = normalize_email(&req.email).map_err(KanbanError::BadRequest)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(db)
        .await?;

    let user = user.ok_or_else(|| KanbanError::Unauthorized("Invalid email or password".into()))?;

    let ok = password::verify_password(&req.password, &user.password_hash)
        .map_err(|e| KanbanError::Internal(format!("Failed to verify password: {}", e)))?;
    if !ok {
        return Err(KanbanError::Unauthorized("Invalid email or password".into()));
    }

    Ok(Json(SessionResponse { user: user.into() }))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<Value>, KanbanError> {
    let db = state.require_db()?;
    let email = normalize_email(&req.email).map_err(KanbanError::BadRequest)?;

    state
        .verification
        .consume(&email, &req.token)
        .map_err(|e| match e {
            TokenError::Invalid => KanbanError::BadRequest("Invalid verification token".into()),
            TokenError::Expired => KanbanError::BadRequest(
                "Verification token expired. Request a new verification email.".into(),
            ),
        })?;

    sqlx::query("UPDATE users SET email_verified = 1 WHERE email = ?")
        .bind(&email)
        .execute(db)
        .await?;

    let mailer = state.mailer.clone();
    let email_for_task = email.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&email_for_task).await {
            tracing::warn!("Failed to send welcome email: {}", e);
        }
    });

    Ok(Json(json!({ "success": true })))
}

pub async fn check_verified(
    State(state): State<AppState>,
    Query(query): Query<VerifiedQuery>,
) -> Result<Json<Value>, KanbanError> {
    let db = state.require_db()?;
    let email = query.email.to_lowercase();

    let row: Option<(bool,)> = sqlx::query_as("SELECT email_verified FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(db)
        .await?;

    Ok(Json(json!({
        "verified": row.map(|r| r.0).unwrap_or(false)
    })))
}
