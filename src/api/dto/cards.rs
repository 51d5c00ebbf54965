use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateColumnRequest {
    pub board_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameColumnRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub column_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelInput {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// An empty string clears the due date.
    #[serde(default)]
    pub due_date: Option<String>,
    /// When present, replaces the card's label set by value.
    #[serde(default)]
    pub labels: Option<Vec<LabelInput>>,
}

#[derive(Debug, Deserialize)]
pub struct MoveCardRequest {
    pub target_column_id: String,
    pub target_index: usize,
}
