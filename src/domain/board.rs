use serde::{Deserialize, Serialize};

use crate::domain::LabelColor;

/// Top-level container: an ordered list of columns plus the sharing list.
/// Column order is significant and preserved across reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
    pub owner_id: String,
    /// Emails with access, always stored lowercased.
    pub shared_with: Vec<String>,
    pub columns: Vec<Column>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub cards: Vec<Card>,
    pub created_at: String,
}

/// Within a column, the in-memory card order is the source of truth; the
/// numeric `position` is a serialization detail recomputed on every
/// mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub position: i64,
    pub column_id: String,
    pub created_at: String,
}

/// Labels are attached by value: each card owns its own copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: LabelColor,
}

impl Board {
    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Locates a card anywhere on the board, returning its column id and
    /// index within that column.
    pub fn locate_card(&self, card_id: &str) -> Option<(&str, usize)> {
        for column in &self.columns {
            if let Some(idx) = column.cards.iter().position(|c| c.id == card_id) {
                return Some((column.id.as_str(), idx));
            }
        }
        None
    }
}

impl Column {
    /// Renumbers `position` to match the in-memory order.
    pub fn renumber(&mut self) {
        for (i, card) in self.cards.iter_mut().enumerate() {
            card.position = i as i64;
        }
    }
}
