use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ClientError;
use crate::domain::{Board, Card, Column, Label};

/// Boards owned by and shared with one user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserBoards {
    pub owned: Vec<Board>,
    pub shared: Vec<Board>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareResponse {
    pub shared_with: Vec<String>,
    pub user_exists: bool,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Partial card update; absent fields are left untouched. An empty due
/// date string clears the date, and a provided label set replaces the old
/// one by value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
}

/// The persistence collaborator the client core talks to. One method per
/// server operation; implementations must not reorder or merge calls.
#[async_trait]
pub trait BoardsApi: Send + Sync {
    async fn fetch_boards_for_user(
        &self,
        user_id: &str,
        user_email: &str,
    ) -> Result<UserBoards, ClientError>;

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ClientError>;

    async fn create_board(&self, title: &str, owner_id: &str) -> Result<Board, ClientError>;

    async fn delete_board(&self, board_id: &str) -> Result<(), ClientError>;

    async fn rename_board(&self, board_id: &str, title: &str) -> Result<(), ClientError>;

    async fn share_board(&self, board_id: &str, email: &str)
        -> Result<ShareResponse, ClientError>;

    async fn unshare_board(&self, board_id: &str, email: &str) -> Result<(), ClientError>;

    async fn create_column(&self, board_id: &str, title: &str) -> Result<Column, ClientError>;

    async fn rename_column(&self, column_id: &str, title: &str) -> Result<(), ClientError>;

    async fn delete_column(&self, column_id: &str) -> Result<(), ClientError>;

    async fn create_card(&self, column_id: &str, title: &str) -> Result<Card, ClientError>;

    async fn update_card(&self, card_id: &str, patch: CardPatch) -> Result<Card, ClientError>;

    async fn delete_card(&self, card_id: &str) -> Result<(), ClientError>;

    async fn move_card(
        &self,
        card_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<(), ClientError>;
}

/// `BoardsApi` over the HTTP surface in `api::routes`.
#[derive(Clone)]
pub struct HttpBoardsApi {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct BoardListBody {
    boards: Vec<Board>,
    shared_boards: Vec<Board>,
}

impl HttpBoardsApi {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http_client,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps non-success statuses onto the client error taxonomy, pulling
    /// the server's JSON `error` message through when it has one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        match status.as_u16() {
            404 => Err(ClientError::NotFound(message)),
            400 => Err(ClientError::Validation(message)),
            _ => Err(ClientError::Transport(message)),
        }
    }
}

#[async_trait]
impl BoardsApi for HttpBoardsApi {
    async fn fetch_boards_for_user(
        &self,
        user_id: &str,
        user_email: &str,
    ) -> Result<UserBoards, ClientError> {
        let response = self
            .http_client
            .get(self.url("/api/boards"))
            .query(&[("user_id", user_id), ("user_email", user_email)])
            .send()
            .await?;
        let body: BoardListBody = Self::check(response).await?.json().await?;

        Ok(UserBoards {
            owned: body.boards,
            shared: body.shared_boards,
        })
    }

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/boards/{}", board_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_board(&self, title: &str, owner_id: &str) -> Result<Board, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/boards"))
            .json(&serde_json::json!({ "title": title, "owner_id": owner_id }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_board(&self, board_id: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/boards/{}", board_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn rename_board(&self, board_id: &str, title: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .patch(self.url(&format!("/api/boards/{}", board_id)))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn share_board(
        &self,
        board_id: &str,
        email: &str,
    ) -> Result<ShareResponse, ClientError> {
        let response = self
            .http_client
            .post(self.url(&format!("/api/boards/{}/share", board_id)))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn unshare_board(&self, board_id: &str, email: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/boards/{}/share", board_id)))
            .query(&[("email", email)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_column(&self, board_id: &str, title: &str) -> Result<Column, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/columns"))
            .json(&serde_json::json!({ "board_id": board_id, "title": title }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn rename_column(&self, column_id: &str, title: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .patch(self.url(&format!("/api/columns/{}", column_id)))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_column(&self, column_id: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/columns/{}", column_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_card(&self, column_id: &str, title: &str) -> Result<Card, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/cards"))
            .json(&serde_json::json!({ "column_id": column_id, "title": title }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_card(&self, card_id: &str, patch: CardPatch) -> Result<Card, ClientError> {
        let response = self
            .http_client
            .patch(self.url(&format!("/api/cards/{}", card_id)))
            .json(&patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_card(&self, card_id: &str) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/cards/{}", card_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn move_card(
        &self,
        card_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<(), ClientError> {
        let response = self
            .http_client
            .patch(self.url(&format!("/api/cards/{}/move", card_id)))
            .json(&serde_json::json!({
                "target_column_id": target_column_id,
                "target_index": target_index,
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
