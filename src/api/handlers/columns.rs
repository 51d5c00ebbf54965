use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::{CreateColumnRequest, RenameColumnRequest};
use crate::api::state::AppState;
use crate::domain::{Column, KanbanError};
use crate::services::CardService;

pub async fn create_column(
    State(state): State<AppState>,
    Json(req): Json<CreateColumnRequest>,
) -> Result<(StatusCode, Json<Column>), KanbanError> {
    let db = state.require_db()?;
    let column = CardService::create_column(db, &req.board_id, &req.title).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn rename_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameColumnRequest>,
) -> Result<Json<Column>, KanbanError> {
    let db = state.require_db()?;
    let column = CardService::rename_column(db, &id, &req.title).await?;
    Ok(Json(column))
}

pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    CardService::delete_column(db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
