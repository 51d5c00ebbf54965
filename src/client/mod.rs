//! Client-side board engine: optimistic drag-and-drop reordering against a
//! server of record.
//!
//! A drag gesture flows planner → snapshot → session: `planner::plan_move`
//! resolves the drop target to a `(column, index)` pair, `snapshot` applies
//! the move to the local board immediately, and `BoardSession` persists it
//! and resynchronizes from the authoritative store.

pub mod api;
pub mod planner;
pub mod session;
pub mod snapshot;

pub use api::{BoardsApi, CardPatch, HttpBoardsApi, ShareResponse, UserBoards};
pub use planner::{plan_move, DropTarget, MovePlan};
pub use session::BoardSession;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("transport: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
