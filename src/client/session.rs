use std::sync::Arc;

use crate::client::api::{BoardsApi, CardPatch, ShareResponse};
use crate::client::planner::{plan_move, DropTarget};
use crate::client::{snapshot, ClientError};
use crate::domain::user::normalize_email;
use crate::domain::{Board, Card, Column, SessionUser};

/// One user's view of the board world: the boards they own, the boards
/// shared with them, and the board currently open on screen.
///
/// The current board is tracked independently of the two lists and always
/// refreshed with a fresh fetch, so repeated resyncs never have to re-derive
/// it. Every mutating operation resynchronizes from the server afterwards;
/// the server response always overwrites the local snapshot wholesale
/// (last response wins — concurrent editors are not merged).
pub struct BoardSession {
    api: Arc<dyn BoardsApi>,
    user: Option<SessionUser>,
    boards: Vec<Board>,
    shared_boards: Vec<Board>,
    current: Option<Board>,
}

impl BoardSession {
    pub fn new(api: Arc<dyn BoardsApi>) -> Self {
        Self {
            api,
            user: None,
            boards: vec![],
            shared_boards: vec![],
            current: None,
        }
    }

    pub fn set_user(&mut self, user: Option<SessionUser>) {
        self.user = user;
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Boards owned by the signed-in user.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Boards shared with the signed-in user (by email).
    pub fn shared_boards(&self) -> &[Board] {
        &self.shared_boards
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current.as_ref()
    }

    pub fn is_owner(&self, board: &Board) -> bool {
        self.user
            .as_ref()
            .map(|u| u.id == board.owner_id)
            .unwrap_or(false)
    }

    // ── Board list ─────────────────────────────────────────────

    /// Reloads the owned/shared lists. Without a signed-in user both lists
    /// are empty. A current board found in the fresh lists is updated in
    /// place so the dashboard and the open board never diverge.
    pub async fn load_boards(&mut self) -> Result<(), ClientError> {
        let Some(user) = self.user.clone() else {
            self.boards.clear();
            self.shared_boards.clear();
            return Ok(());
        };

        let fetched = self.api.fetch_boards_for_user(&user.id, &user.email).await?;
        self.boards = fetched.owned;
        self.shared_boards = fetched.shared;

        if let Some(current_id) = self.current.as_ref().map(|b| b.id.clone()) {
            let updated = self
                .boards
                .iter()
                .chain(self.shared_boards.iter())
                .find(|b| b.id == current_id)
                .cloned();
            if let Some(board) = updated {
                self.current = Some(board);
            }
        }

        Ok(())
    }

    /// Opens a board, always with a fresh fetch rather than reusing the
    /// list entry.
    pub async fn select_board(&mut self, board_id: &str) -> Result<(), ClientError> {
        let board = self.api.fetch_board(board_id).await?;
        self.current = Some(board);
        Ok(())
    }

    /// Replaces the current snapshot with the server's authoritative
    /// state. Failures are logged and leave the previous snapshot on
    /// screen; a later refresh converges.
    pub async fn refresh_current(&mut self) {
        let Some(board_id) = self.current.as_ref().map(|b| b.id.clone()) else {
            return;
        };

        match self.api.fetch_board(&board_id).await {
            Ok(board) => self.current = Some(board),
            Err(e) => tracing::warn!(board_id, "Failed to refresh board: {}", e),
        }
    }

    async fn resync(&mut self) {
        if let Err(e) = self.load_boards().await {
            tracing::warn!("Failed to reload board lists: {}", e);
        }
        self.refresh_current().await;
    }

    // ── Board mutations ────────────────────────────────────────

    pub async fn create_board(&mut self, title: &str) -> Result<Board, ClientError> {
        let user = self.require_user()?.clone();
        let title = require_title(title)?;

        let board = self.api.create_board(&title, &user.id).await?;
        self.boards.push(board.clone());
        Ok(board)
    }

    pub async fn delete_board(&mut self, board_id: &str) -> Result<(), ClientError> {
        self.api.delete_board(board_id).await?;

        self.boards.retain(|b| b.id != board_id);
        self.shared_boards.retain(|b| b.id != board_id);
        if self.current.as_ref().is_some_and(|b| b.id == board_id) {
            self.current = None;
        }
        Ok(())
    }

    pub async fn rename_board(&mut self, board_id: &str, title: &str) -> Result<(), ClientError> {
        let title = require_title(title)?;
        self.api.rename_board(board_id, &title).await?;
        self.resync().await;
        Ok(())
    }

    pub async fn share_board(
        &mut self,
        board_id: &str,
        email: &str,
    ) -> Result<ShareResponse, ClientError> {
        let email = normalize_email(email).map_err(ClientError::Validation)?;
        let response = self.api.share_board(board_id, &email).await?;
        self.resync().await;
        Ok(response)
    }

    pub async fn unshare_board(&mut self, board_id: &str, email: &str) -> Result<(), ClientError> {
        let email = normalize_email(email).map_err(ClientError::Validation)?;
        self.api.unshare_board(board_id, &email).await?;
        self.resync().await;
        Ok(())
    }

    // ── Column and card mutations ──────────────────────────────

    pub async fn add_column(&mut self, board_id: &str, title: &str) -> Result<Column, ClientError> {
        let title = require_title(title)?;
        let column = self.api.create_column(board_id, &title).await?;
        self.refresh_current().await;
        Ok(column)
    }

    pub async fn rename_column(&mut self, column_id: &str, title: &str) -> Result<(), ClientError> {
        let title = require_title(title)?;
        self.api.rename_column(column_id, &title).await?;
        self.refresh_current().await;
        Ok(())
    }

    pub async fn delete_column(&mut self, column_id: &str) -> Result<(), ClientError> {
        self.api.delete_column(column_id).await?;
        self.refresh_current().await;
        Ok(())
    }

    pub async fn add_card(&mut self, column_id: &str, title: &str) -> Result<Card, ClientError> {
        let title = require_title(title)?;
        let card = self.api.create_card(column_id, &title).await?;
        self.refresh_current().await;
        Ok(card)
    }

    pub async fn update_card(
        &mut self,
        card_id: &str,
        patch: CardPatch,
    ) -> Result<Card, ClientError> {
        if let Some(title) = &patch.title {
            require_title(title)?;
        }
        let card = self.api.update_card(card_id, patch).await?;
        self.refresh_current().await;
        Ok(card)
    }

    pub async fn delete_card(&mut self, card_id: &str) -> Result<(), ClientError> {
        self.api.delete_card(card_id).await?;
        self.refresh_current().await;
        Ok(())
    }

    // ── Drag and drop ──────────────────────────────────────────

    /// Completes a drag gesture: plan, apply to the snapshot immediately,
    /// persist, resync from the server.
    ///
    /// The local mutation happens before any network call so the user sees
    /// the result of their own gesture with zero latency. A failed persist
    /// is not rolled back; the snapshot stays optimistic until a refresh
    /// succeeds. Returns `false` for a no-op gesture, which performs no
    /// network calls at all.
    pub async fn move_card(
        &mut self,
        card_id: &str,
        source_column_id: &str,
        target: &DropTarget,
    ) -> bool {
        let Some(board) = self.current.as_mut() else {
            return false;
        };
        let Some(plan) = plan_move(board, card_id, source_column_id, target) else {
            return false;
        };
        if !snapshot::apply_move(board, &plan) {
            return false;
        }

        if let Err(e) = self
            .api
            .move_card(&plan.card_id, &plan.target_column_id, plan.target_index)
            .await
        {
            tracing::warn!(
                card_id = plan.card_id.as_str(),
                "Failed to persist card move: {}",
                e
            );
        }

        self.refresh_current().await;
        true
    }

    fn require_user(&self) -> Result<&SessionUser, ClientError> {
        self.user
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Not signed in".into()))
    }
}

fn require_title(title: &str) -> Result<String, ClientError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ClientError::Validation("Title must not be empty".into()));
    }
    Ok(title.to_string())
}
