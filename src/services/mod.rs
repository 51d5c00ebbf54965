pub mod board_service;
pub mod card_service;
pub mod mailer;

pub use board_service::BoardService;
pub use card_service::CardService;
pub use mailer::Mailer;
