use serde::{Deserialize, Serialize};

use crate::domain::Board;

#[derive(Debug, Deserialize)]
pub struct UserBoardsQuery {
    pub user_id: String,
    pub user_email: String,
}

#[derive(Debug, Serialize)]
pub struct BoardListResponse {
    pub boards: Vec<Board>,
    pub shared_boards: Vec<Board>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameBoardRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareBoardRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UnshareQuery {
    pub email: String,
}
