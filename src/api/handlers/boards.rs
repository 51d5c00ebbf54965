use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::{
    BoardListResponse, CreateBoardRequest, RenameBoardRequest, ShareBoardRequest, UnshareQuery,
    UserBoardsQuery,
};
use crate::api::state::AppState;
use crate::domain::{Board, KanbanError};
use crate::services::board_service::{ShareEntry, ShareOutcome};
use crate::services::BoardService;

pub async fn list_boards(
    State(state): State<AppState>,
    Query(query): Query<UserBoardsQuery>,
) -> Result<Json<BoardListResponse>, KanbanError> {
    let db = state.require_db()?;

    let (boards, shared_boards) =
        BoardService::list_boards_for_user(db, &query.user_id, &query.user_email).await?;

    Ok(Json(BoardListResponse {
        boards,
        shared_boards,
    }))
}

pub async fn create_board(
    State(state): State<AppState>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), KanbanError> {
    let db = state.require_db()?;
    let board = BoardService::create_board(db, &req.title, &req.owner_id).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Board>, KanbanError> {
    let db = state.require_db()?;
    let board = BoardService::get_board(db, &id).await?;
    Ok(Json(board))
}

pub async fn rename_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameBoardRequest>,
) -> Result<Json<Board>, KanbanError> {
    let db = state.require_db()?;
    let board = BoardService::rename_board(db, &id, &req.title).await?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    BoardService::delete_board(db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn share_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ShareBoardRequest>,
) -> Result<Json<ShareOutcome>, KanbanError> {
    let db = state.require_db()?;
    let outcome = BoardService::share_board(db, &id, &req.email).await?;

    // Unregistered collaborators get an invite email, fire-and-forget.
    if !outcome.user_exists {
        let mailer = state.mailer.clone();
        let email = req.email.trim().to_lowercase();
        let board_title = outcome.board_title.clone();
        let owner_name = outcome.owner_name.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_invite(&email, &board_title, &owner_name).await {
                tracing::warn!("Failed to send invite email: {}", e);
            }
        });
    }

    Ok(Json(outcome))
}

pub async fn list_shares(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ShareEntry>>, KanbanError> {
    let db = state.require_db()?;
    let shares = BoardService::list_shares(db, &id).await?;
    Ok(Json(shares))
}

pub async fn unshare_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UnshareQuery>,
) -> Result<StatusCode, KanbanError> {
    let db = state.require_db()?;
    BoardService::unshare_board(db, &id, &query.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
