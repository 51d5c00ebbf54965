use std::collections::HashMap;
use std::str::FromStr;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::user::normalize_email;
use crate::domain::{Board, Card, Column, KanbanError, Label, LabelColor};

#[derive(Debug, sqlx::FromRow)]
struct BoardRow {
    id: String,
    title: String,
    owner_id: String,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ColumnRow {
    id: String,
    title: String,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: String,
    column_id: String,
    title: String,
    description: Option<String>,
    due_date: Option<String>,
    position: i64,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct LabelRow {
    id: String,
    card_id: String,
    name: Option<String>,
    color: String,
}

/// Total mapping from persistence rows to the domain card. Every optional
/// field gets a defined default; an unrecognized color (possible only for
/// hand-edited rows, write paths validate) falls back to blue.
fn card_from_row(row: CardRow, labels: Vec<LabelRow>) -> Card {
    Card {
        id: row.id,
        title: row.title,
        description: row.description.unwrap_or_default(),
        labels: labels
            .into_iter()
            .map(|l| Label {
                id: l.id,
                name: l.name.unwrap_or_default(),
                color: LabelColor::from_str(&l.color).unwrap_or(LabelColor::Blue),
            })
            .collect(),
        due_date: row.due_date,
        position: row.position,
        column_id: row.column_id,
        created_at: row.created_at,
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ShareOutcome {
    pub shared_with: Vec<String>,
    pub user_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    pub board_title: String,
    #[serde(skip)]
    pub owner_name: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ShareEntry {
    pub email: String,
    pub name: Option<String>,
    pub registered: bool,
}

pub struct BoardService;

impl BoardService {
    pub async fn list_boards_for_user(
        pool: &SqlitePool,
        user_id: &str,
        user_email: &str,
    ) -> Result<(Vec<Board>, Vec<Board>), KanbanError> {
        let email = user_email.to_lowercase();

        let owned_rows: Vec<BoardRow> = sqlx::query_as(
            "SELECT id, title, owner_id, created_at FROM boards WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let shared_rows: Vec<BoardRow> = sqlx::query_as(
            "SELECT b.id, b.title, b.owner_id, b.created_at FROM boards b JOIN board_shares s ON s.board_id = b.id WHERE s.email = ? ORDER BY b.created_at DESC",
        )
        .bind(&email)
        .fetch_all(pool)
        .await?;

        let mut owned = Vec::with_capacity(owned_rows.len());
        for row in owned_rows {
            owned.push(Self::assemble_board(pool, row).await?);
        }

        let mut shared = Vec::with_capacity(shared_rows.len());
        for row in shared_rows {
            shared.push(Self::assemble_board(pool, row).await?);
        }

        Ok((owned, shared))
    }

    pub async fn get_board(pool: &SqlitePool, id: &str) -> Result<Board, KanbanError> {
        let row: BoardRow =
            sqlx::query_as("SELECT id, title, owner_id, created_at FROM boards WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?
                .ok_or_else(|| KanbanError::NotFound(format!("Board not found: {}", id)))?;

        Self::assemble_board(pool, row).await
    }

    pub async fn create_board(
        pool: &SqlitePool,
        title: &str,
        owner_id: &str,
    ) -> Result<Board, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::BadRequest("Title must not be empty".into()));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO boards (id, title, owner_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(title)
            .bind(owner_id)
            .bind(&now)
            .execute(pool)
            .await?;

        Self::get_board(pool, &id).await
    }

    pub async fn rename_board(
        pool: &SqlitePool,
        id: &str,
        title: &str,
    ) -> Result<Board, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::BadRequest("Title must not be empty".into()));
        }

        let result = sqlx::query("UPDATE boards SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Board not found: {}", id)));
        }

        Self::get_board(pool, id).await
    }

    pub async fn delete_board(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Board not found: {}", id)));
        }

        Ok(())
    }

    // ── Sharing ────────────────────────────────────────────────

    pub async fn share_board(
        pool: &SqlitePool,
        board_id: &str,
        email: &str,
    ) -> Result<ShareOutcome, KanbanError> {
        let email = normalize_email(email).map_err(KanbanError::BadRequest)?;

        let board: BoardRow =
            sqlx::query_as("SELECT id, title, owner_id, created_at FROM boards WHERE id = ?")
                .bind(board_id)
                .fetch_optional(pool)
                .await?
                .ok_or_else(|| KanbanError::NotFound(format!("Board not found: {}", board_id)))?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT email FROM board_shares WHERE board_id = ? AND email = ?")
                .bind(board_id)
                .bind(&email)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Err(KanbanError::BadRequest(
                "This email already has access to the board".into(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO board_shares (board_id, email, created_at) VALUES (?, ?, ?)")
            .bind(board_id)
            .bind(&email)
            .bind(&now)
            .execute(pool)
            .await?;

        let user: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(pool)
            .await?;
        let user_exists = user.is_some();

        let owner_name: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE id = ?")
            .bind(&board.owner_id)
            .fetch_optional(pool)
            .await?;

        let shared_with = Self::fetch_shares(pool, board_id).await?;

        Ok(ShareOutcome {
            shared_with,
            user_exists,
            warning: if user_exists {
                None
            } else {
                Some("This email is not registered. An invite has been sent.".into())
            },
            board_title: board.title,
            owner_name: owner_name.map(|r| r.0).unwrap_or_default(),
        })
    }

    pub async fn unshare_board(
        pool: &SqlitePool,
        board_id: &str,
        email: &str,
    ) -> Result<(), KanbanError> {
        let email = normalize_email(email).map_err(KanbanError::BadRequest)?;

        let result = sqlx::query("DELETE FROM board_shares WHERE board_id = ? AND email = ?")
            .bind(board_id)
            .bind(&email)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!(
                "Share not found for {}",
                email
            )));
        }

        Ok(())
    }

    pub async fn list_shares(
        pool: &SqlitePool,
        board_id: &str,
    ) -> Result<Vec<ShareEntry>, KanbanError> {
        let shares: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM board_shares WHERE board_id = ? ORDER BY created_at ASC",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        let mut entries = Vec::with_capacity(shares.len());
        for (email,) in shares {
            let user: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE email = ?")
                .bind(&email)
                .fetch_optional(pool)
                .await?;
            entries.push(ShareEntry {
                email,
                name: user.as_ref().map(|r| r.0.clone()),
                registered: user.is_some(),
            });
        }

        Ok(entries)
    }

    // ── Assembly ───────────────────────────────────────────────

    async fn fetch_shares(pool: &SqlitePool, board_id: &str) -> Result<Vec<String>, KanbanError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM board_shares WHERE board_id = ? ORDER BY created_at ASC",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Loads the full board tree. Columns and cards come back ordered by
    /// their persisted position; label rows are grouped per card in memory
    /// to avoid a query per card.
    async fn assemble_board(pool: &SqlitePool, row: BoardRow) -> Result<Board, KanbanError> {
        let shared_with = Self::fetch_shares(pool, &row.id).await?;

        let column_rows: Vec<ColumnRow> = sqlx::query_as(
            "SELECT id, title, created_at FROM columns WHERE board_id = ? ORDER BY position ASC",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let card_rows: Vec<CardRow> = sqlx::query_as(
            "SELECT c.id, c.column_id, c.title, c.description, c.due_date, c.position, c.created_at
             FROM cards c JOIN columns col ON c.column_id = col.id
             WHERE col.board_id = ? ORDER BY c.position ASC",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let label_rows: Vec<LabelRow> = sqlx::query_as(
            "SELECT l.id, l.card_id, l.name, l.color
             FROM labels l JOIN cards c ON l.card_id = c.id JOIN columns col ON c.column_id = col.id
             WHERE col.board_id = ?",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let mut labels_by_card: HashMap<String, Vec<LabelRow>> = HashMap::new();
        for label in label_rows {
            labels_by_card
                .entry(label.card_id.clone())
                .or_default()
                .push(label);
        }

        let mut cards_by_column: HashMap<String, Vec<Card>> = HashMap::new();
        for card_row in card_rows {
            let labels = labels_by_card.remove(&card_row.id).unwrap_or_default();
            let card = card_from_row(card_row, labels);
            cards_by_column
                .entry(card.column_id.clone())
                .or_default()
                .push(card);
        }

        let columns = column_rows
            .into_iter()
            .map(|col| Column {
                cards: cards_by_column.remove(&col.id).unwrap_or_default(),
                id: col.id,
                title: col.title,
                created_at: col.created_at,
            })
            .collect();

        Ok(Board {
            id: row.id,
            title: row.title,
            owner_id: row.owner_id,
            shared_with,
            columns,
            created_at: row.created_at,
        })
    }
}
