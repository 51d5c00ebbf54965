use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::{CreateCardRequest, MoveCardRequest, UpdateCardRequest};
use crate::api::state::AppState;
use crate::domain::{Card, KanbanError};
use crate::services::CardService;

pub async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>), KanbanError> {
    let db = state.require_db()?;
    let card = CardService::create_card(db, &req.column_id, &req.title).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Card>, KanbanError> {
    let db = state.require_db()?;
    let card = CardService::get_card(db, &id).await?;
    Ok(Json(card))
}

pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<Card>, KanbanError> {
    let db = state.require_db()?;
    let card = CardService::update_card(db, &id, req).await?;
    Ok(Json(card))
}

pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    CardService::delete_card(db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveCardRequest>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    CardService::move_card(db, &id, &req.target_column_id, req.target_index).await?;
    Ok(StatusCode::NO_CONTENT)
}
