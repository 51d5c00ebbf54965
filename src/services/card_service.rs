use std::str::FromStr;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::api::dto::{LabelInput, UpdateCardRequest};
use crate::domain::{Card, Column, KanbanError, Label, LabelColor};

pub struct CardService;

impl CardService {
    // ── Column CRUD ────────────────────────────────────────────

    pub async fn create_column(
        pool: &SqlitePool,
        board_id: &str,
        title: &str,
    ) -> Result<Column, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::BadRequest("Title must not be empty".into()));
        }

        let board: Option<(String,)> = sqlx::query_as("SELECT id FROM boards WHERE id = ?")
            .bind(board_id)
            .fetch_optional(pool)
            .await?;
        if board.is_none() {
            return Err(KanbanError::NotFound(format!(
                "Board not found: {}",
                board_id
            )));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        // Appended at the end of the board's column sequence.
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM columns WHERE board_id = ?")
            .bind(board_id)
            .fetch_one(pool)
            .await?;
        let position: i64 = row.get("cnt");

        sqlx::query(
            "INSERT INTO columns (id, board_id, title, position, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(board_id)
        .bind(title)
        .bind(position)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(Column {
            id,
            title: title.to_string(),
            cards: vec![],
            created_at: now,
        })
    }

    pub async fn rename_column(
        pool: &SqlitePool,
        id: &str,
        title: &str,
    ) -> Result<Column, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::BadRequest("Title must not be empty".into()));
        }

        let result = sqlx::query("UPDATE columns SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Column not found: {}", id)));
        }

        Self::get_column(pool, id).await
    }

    pub async fn get_column(pool: &SqlitePool, id: &str) -> Result<Column, KanbanError> {
        let row = sqlx::query("SELECT id, title, created_at FROM columns WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Column not found: {}", id)))?;

        let ids = Self::ordered_card_ids(pool, id).await?;
        let mut cards = Vec::with_capacity(ids.len());
        for card_id in &ids {
            cards.push(Self::get_card(pool, card_id).await?);
        }

        Ok(Column {
            id: row.get("id"),
            title: row.get("title"),
            cards,
            created_at: row.get("created_at"),
        })
    }

    pub async fn delete_column(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let result = sqlx::query("DELETE FROM columns WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Column not found: {}", id)));
        }

        Ok(())
    }

    // ── Card CRUD ──────────────────────────────────────────────

    pub async fn create_card(
        pool: &SqlitePool,
        column_id: &str,
        title: &str,
    ) -> Result<Card, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::BadRequest("Title must not be empty".into()));
        }

        let column: Option<(String,)> = sqlx::query_as("SELECT id FROM columns WHERE id = ?")
            .bind(column_id)
            .fetch_optional(pool)
            .await?;
        if column.is_none() {
            return Err(KanbanError::NotFound(format!(
                "Column not found: {}",
                column_id
            )));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        // Appended at the end of the column's card sequence.
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM cards WHERE column_id = ?")
            .bind(column_id)
            .fetch_one(pool)
            .await?;
        let position: i64 = row.get("cnt");

        sqlx::query(
            "INSERT INTO cards (id, column_id, title, description, due_date, position, created_at, updated_at) VALUES (?, ?, ?, '', NULL, ?, ?, ?)",
        )
        .bind(&id)
        .bind(column_id)
        .bind(title)
        .bind(position)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::get_card(pool, &id).await
    }

    pub async fn get_card(pool: &SqlitePool, id: &str) -> Result<Card, KanbanError> {
        let row = sqlx::query(
            "SELECT id, column_id, title, description, due_date, position, created_at FROM cards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| KanbanError::NotFound(format!("Card not found: {}", id)))?;

        let labels = Self::get_labels(pool, id).await?;

        Ok(Card {
            id: row.get("id"),
            column_id: row.get("column_id"),
            title: row.get("title"),
            description: row
                .get::<Option<String>, _>("description")
                .unwrap_or_default(),
            due_date: row.get("due_date"),
            position: row.get("position"),
            created_at: row.get("created_at"),
            labels,
        })
    }

    pub async fn update_card(
        pool: &SqlitePool,
        id: &str,
        req: UpdateCardRequest,
    ) -> Result<Card, KanbanError> {
        let existing = Self::get_card(pool, id).await?;

        // Validate label colors before touching any row.
        if let Some(labels) = &req.labels {
            for label in labels {
                LabelColor::from_str(&label.color).map_err(KanbanError::BadRequest)?;
            }
        }

        let now = Utc::now().to_rfc3339();
        let title = match req.title {
            Some(t) if t.trim().is_empty() => {
                return Err(KanbanError::BadRequest("Title must not be empty".into()))
            }
            Some(t) => t.trim().to_string(),
            None => existing.title,
        };
        let description = req.description.unwrap_or(existing.description);
        // An explicit empty string clears the due date; absent leaves it.
        let due_date = match &req.due_date {
            Some(s) if s.is_empty() => None,
            Some(s) => Some(s.clone()),
            None => existing.due_date,
        };

        sqlx::query(
            "UPDATE cards SET title = ?, description = ?, due_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&title)
        .bind(&description)
        .bind(&due_date)
        .bind(&now)
        .bind(id)
        .execute(pool)
        .await?;

        // Labels are attached by value: a provided set replaces the old one.
        if let Some(labels) = req.labels {
            Self::replace_labels(pool, id, labels).await?;
        }

        Self::get_card(pool, id).await
    }

    pub async fn delete_card(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Card not found: {}", id)));
        }

        Ok(())
    }

    /// Moves a card to `target_index` within `target_column_id` and
    /// renumbers positions densely (0..n) in every affected column. The
    /// index is clamped to the end of the target sequence.
    pub async fn move_card(
        pool: &SqlitePool,
        id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<(), KanbanError> {
        let card = sqlx::query("SELECT id, column_id FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Card not found: {}", id)))?;
        let source_column_id: String = card.get("column_id");

        let target: Option<(String,)> = sqlx::query_as("SELECT id FROM columns WHERE id = ?")
            .bind(target_column_id)
            .fetch_optional(pool)
            .await?;
        if target.is_none() {
            return Err(KanbanError::NotFound(format!(
                "Column not found: {}",
                target_column_id
            )));
        }

        let mut source_ids = Self::ordered_card_ids(pool, &source_column_id).await?;
        source_ids.retain(|cid| cid != id);

        let mut target_ids = if source_column_id == target_column_id {
            source_ids.clone()
        } else {
            Self::ordered_card_ids(pool, target_column_id).await?
        };
        let index = target_index.min(target_ids.len());
        target_ids.insert(index, id.to_string());

        let now = Utc::now().to_rfc3339();
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE cards SET column_id = ?, updated_at = ? WHERE id = ?")
            .bind(target_column_id)
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (pos, cid) in target_ids.iter().enumerate() {
            sqlx::query("UPDATE cards SET position = ? WHERE id = ?")
                .bind(pos as i64)
                .bind(cid)
                .execute(&mut *tx)
                .await?;
        }

        if source_column_id != target_column_id {
            for (pos, cid) in source_ids.iter().enumerate() {
                sqlx::query("UPDATE cards SET position = ? WHERE id = ?")
                    .bind(pos as i64)
                    .bind(cid)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    // ── Helpers ────────────────────────────────────────────────

    async fn ordered_card_ids(
        pool: &SqlitePool,
        column_id: &str,
    ) -> Result<Vec<String>, KanbanError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM cards WHERE column_id = ? ORDER BY position ASC")
                .bind(column_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn get_labels(pool: &SqlitePool, card_id: &str) -> Result<Vec<Label>, KanbanError> {
        let rows = sqlx::query("SELECT id, name, color FROM labels WHERE card_id = ?")
            .bind(card_id)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Label {
                id: row.get("id"),
                name: row.get::<Option<String>, _>("name").unwrap_or_default(),
                color: LabelColor::from_str(&row.get::<String, _>("color"))
                    .unwrap_or(LabelColor::Blue),
            })
            .collect())
    }

    async fn replace_labels(
        pool: &SqlitePool,
        card_id: &str,
        labels: Vec<LabelInput>,
    ) -> Result<(), KanbanError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM labels WHERE card_id = ?")
            .bind(card_id)
            .execute(&mut *tx)
            .await?;

        for label in labels {
            sqlx::query("INSERT INTO labels (id, card_id, name, color) VALUES (?, ?, ?, ?)")
                .bind(Uuid::new_v4().to_string())
                .bind(card_id)
                .bind(&label.name)
                .bind(&label.color)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
