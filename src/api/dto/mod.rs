pub mod boards;
pub mod cards;

pub use boards::{
    BoardListResponse, CreateBoardRequest, RenameBoardRequest, ShareBoardRequest, UnshareQuery,
    UserBoardsQuery,
};
pub use cards::{
    CreateCardRequest, CreateColumnRequest, LabelInput, MoveCardRequest, RenameColumnRequest,
    UpdateCardRequest,
};
