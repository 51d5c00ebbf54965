pub mod board;
pub mod color;
pub mod error;
pub mod user;

pub use board::{Board, Card, Column, Label};
pub use color::LabelColor;
pub use error::KanbanError;
pub use user::{SessionUser, User};
