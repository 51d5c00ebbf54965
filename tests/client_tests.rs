use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kanban_board::client::{
    BoardSession, BoardsApi, CardPatch, ClientError, DropTarget, MovePlan, ShareResponse,
    UserBoards,
};
use kanban_board::client::snapshot;
use kanban_board::domain::{Board, Card, Column, SessionUser};

// ── In-memory server double ────────────────────────────────────

#[derive(Default)]
struct FakeState {
    owned: Vec<Board>,
    shared: Vec<Board>,
    moves: Vec<(String, String, usize)>,
    fetch_board_calls: usize,
    fetch_list_calls: usize,
    fail_moves: bool,
    fail_fetches: bool,
}

/// `BoardsApi` over a mutable in-memory board set, with call counting so
/// tests can assert exactly how much network traffic a gesture produced.
struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    fn new(owned: Vec<Board>, shared: Vec<Board>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                owned,
                shared,
                ..FakeState::default()
            }),
        })
    }

    fn moves(&self) -> Vec<(String, String, usize)> {
        self.state.lock().unwrap().moves.clone()
    }

    fn fetch_board_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_board_calls
    }

    fn fetch_list_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_list_calls
    }

    fn fail_moves(&self) {
        self.state.lock().unwrap().fail_moves = true;
    }

    fn fail_fetches(&self) {
        self.state.lock().unwrap().fail_fetches = true;
    }

    fn push_card(&self, board_id: &str, column_id: &str, card: Card) {
        let mut state = self.state.lock().unwrap();
        let board = find_board(&mut state, board_id).unwrap();
        let column = board
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .unwrap();
        column.cards.push(card);
        column.renumber();
    }
}

fn find_board<'a>(state: &'a mut FakeState, id: &str) -> Option<&'a mut Board> {
    state
        .owned
        .iter_mut()
        .chain(state.shared.iter_mut())
        .find(|b| b.id == id)
}

fn find_board_with_column<'a>(state: &'a mut FakeState, column_id: &str) -> Option<&'a mut Board> {
    state
        .owned
        .iter_mut()
        .chain(state.shared.iter_mut())
        .find(|b| b.columns.iter().any(|c| c.id == column_id))
}

fn find_board_with_card<'a>(state: &'a mut FakeState, card_id: &str) -> Option<&'a mut Board> {
    state
        .owned
        .iter_mut()
        .chain(state.shared.iter_mut())
        .find(|b| b.locate_card(card_id).is_some())
}

#[async_trait]
impl BoardsApi for FakeApi {
    async fn fetch_boards_for_user(
        &self,
        _user_id: &str,
        _user_email: &str,
    ) -> Result<UserBoards, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetch_list_calls += 1;
        if state.fail_fetches {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(UserBoards {
            owned: state.owned.clone(),
            shared: state.shared.clone(),
        })
    }

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetch_board_calls += 1;
        if state.fail_fetches {
            return Err(ClientError::Transport("connection refused".into()));
        }
        find_board(&mut state, board_id)
            .map(|b| b.clone())
            .ok_or_else(|| ClientError::NotFound(board_id.into()))
    }

    async fn create_board(&self, title: &str, owner_id: &str) -> Result<Board, ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = Board {
            id: format!("board-{}", state.owned.len() + 1),
            title: title.into(),
            owner_id: owner_id.into(),
            shared_with: vec![],
            columns: vec![],
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        state.owned.push(board.clone());
        Ok(board)
    }

    async fn delete_board(&self, board_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.owned.retain(|b| b.id != board_id);
        state.shared.retain(|b| b.id != board_id);
        Ok(())
    }

    async fn rename_board(&self, board_id: &str, title: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let board =
            find_board(&mut state, board_id).ok_or_else(|| ClientError::NotFound(board_id.into()))?;
        board.title = title.into();
        Ok(())
    }

    async fn share_board(
        &self,
        board_id: &str,
        email: &str,
    ) -> Result<ShareResponse, ClientError> {
        let mut state = self.state.lock().unwrap();
        let board =
            find_board(&mut state, board_id).ok_or_else(|| ClientError::NotFound(board_id.into()))?;
        board.shared_with.push(email.into());
        Ok(ShareResponse {
            shared_with: board.shared_with.clone(),
            user_exists: true,
            warning: None,
        })
    }

    async fn unshare_board(&self, board_id: &str, email: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let board =
            find_board(&mut state, board_id).ok_or_else(|| ClientError::NotFound(board_id.into()))?;
        board.shared_with.retain(|e| e != email);
        Ok(())
    }

    async fn create_column(&self, board_id: &str, title: &str) -> Result<Column, ClientError> {
        let mut state = self.state.lock().unwrap();
        let board =
            find_board(&mut state, board_id).ok_or_else(|| ClientError::NotFound(board_id.into()))?;
        let column = Column {
            id: format!("col-{}", board.columns.len() + 1),
            title: title.into(),
            cards: vec![],
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        board.columns.push(column.clone());
        Ok(column)
    }

    async fn rename_column(&self, column_id: &str, title: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = find_board_with_column(&mut state, column_id)
            .ok_or_else(|| ClientError::NotFound(column_id.into()))?;
        let column = board
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| ClientError::NotFound(column_id.into()))?;
        column.title = title.into();
        Ok(())
    }

    async fn delete_column(&self, column_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = find_board_with_column(&mut state, column_id)
            .ok_or_else(|| ClientError::NotFound(column_id.into()))?;
        board.columns.retain(|c| c.id != column_id);
        Ok(())
    }

    async fn create_card(&self, column_id: &str, title: &str) -> Result<Card, ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = find_board_with_column(&mut state, column_id)
            .ok_or_else(|| ClientError::NotFound(column_id.into()))?;
        let column = board
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| ClientError::NotFound(column_id.into()))?;
        let card = Card {
            id: format!("{}-card-{}", column_id, column.cards.len() + 1),
            title: title.into(),
            description: String::new(),
            labels: vec![],
            due_date: None,
            position: column.cards.len() as i64,
            column_id: column_id.into(),
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        column.cards.push(card.clone());
        Ok(card)
    }

    async fn update_card(&self, card_id: &str, patch: CardPatch) -> Result<Card, ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = find_board_with_card(&mut state, card_id)
            .ok_or_else(|| ClientError::NotFound(card_id.into()))?;
        let card = board
            .columns
            .iter_mut()
            .find_map(|col| col.cards.iter_mut().find(|c| c.id == card_id))
            .ok_or_else(|| ClientError::NotFound(card_id.into()))?;
        if let Some(title) = patch.title {
            card.title = title;
        }
        if let Some(description) = patch.description {
            card.description = description;
        }
        Ok(card.clone())
    }

    async fn delete_card(&self, card_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        let board = find_board_with_card(&mut state, card_id)
            .ok_or_else(|| ClientError::NotFound(card_id.into()))?;
        for column in &mut board.columns {
            column.cards.retain(|c| c.id != card_id);
            column.renumber();
        }
        Ok(())
    }

    async fn move_card(
        &self,
        card_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state
            .moves
            .push((card_id.into(), target_column_id.into(), target_index));
        if state.fail_moves {
            return Err(ClientError::Transport("connection refused".into()));
        }

        let board = find_board_with_card(&mut state, card_id)
            .ok_or_else(|| ClientError::NotFound(card_id.into()))?;
        let source_column_id = board
            .locate_card(card_id)
            .map(|(col, _)| col.to_string())
            .unwrap_or_default();
        let plan = MovePlan {
            card_id: card_id.into(),
            source_column_id,
            target_column_id: target_column_id.into(),
            target_index,
        };
        snapshot::apply_move(board, &plan);
        Ok(())
    }
}

// ── Fixtures ───────────────────────────────────────────────────

fn card(id: &str, column_id: &str, position: i64) -> Card {
    Card {
        id: id.into(),
        title: id.into(),
        description: String::new(),
        labels: vec![],
        due_date: None,
        position,
        column_id: column_id.into(),
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn column(id: &str, card_ids: &[&str]) -> Column {
    Column {
        id: id.into(),
        title: id.into(),
        cards: card_ids
            .iter()
            .enumerate()
            .map(|(i, cid)| card(cid, id, i as i64))
            .collect(),
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn board(id: &str, owner_id: &str, columns: Vec<Column>) -> Board {
    Board {
        id: id.into(),
        title: id.into(),
        owner_id: owner_id.into(),
        shared_with: vec![],
        columns,
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn alice() -> SessionUser {
    SessionUser {
        id: "u1".into(),
        name: "Alice".into(),
        email: "alice@example.com".into(),
    }
}

fn session_with(api: Arc<FakeApi>) -> BoardSession {
    let mut session = BoardSession::new(api);
    session.set_user(Some(alice()));
    session
}

fn order(session: &BoardSession, column_id: &str) -> Vec<String> {
    session
        .current_board()
        .unwrap()
        .find_column(column_id)
        .unwrap()
        .cards
        .iter()
        .map(|c| c.id.clone())
        .collect()
}

// ── Drag and drop ──────────────────────────────────────────────

#[tokio::test]
async fn drag_before_first_card_is_one_mutation_and_one_read() {
    let api = FakeApi::new(
        vec![board("b1", "u1", vec![column("todo", &["card1", "card2"])])],
        vec![],
    );
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    let moved = session
        .move_card(
            "card2",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "card1".into(),
            },
        )
        .await;

    assert!(moved);
    assert_eq!(order(&session, "todo"), ["card2", "card1"]);
    // Exactly one persisted move, one refresh after it (plus the initial open).
    assert_eq!(api.moves(), vec![("card2".into(), "todo".into(), 0)]);
    assert_eq!(api.fetch_board_calls(), 2);
}

#[tokio::test]
async fn noop_drop_makes_no_network_calls() {
    let api = FakeApi::new(
        vec![board("b1", "u1", vec![column("todo", &["card1", "card2"])])],
        vec![],
    );
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    let moved = session
        .move_card(
            "card1",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "card1".into(),
            },
        )
        .await;

    assert!(!moved);
    assert!(api.moves().is_empty());
    assert_eq!(api.fetch_board_calls(), 1);
    assert_eq!(order(&session, "todo"), ["card1", "card2"]);
}

#[tokio::test]
async fn drop_on_column_appends_and_rewrites_owning_column() {
    let api = FakeApi::new(
        vec![board(
            "b1",
            "u1",
            vec![column("todo", &["a", "b"]), column("done", &["x"])],
        )],
        vec![],
    );
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    let moved = session
        .move_card(
            "a",
            "todo",
            &DropTarget::Column {
                column_id: "done".into(),
            },
        )
        .await;

    assert!(moved);
    assert_eq!(order(&session, "todo"), ["b"]);
    assert_eq!(order(&session, "done"), ["x", "a"]);

    let board = session.current_board().unwrap();
    let a = &board.find_column("done").unwrap().cards[1];
    assert_eq!(a.column_id, "done");
    assert_eq!(api.moves(), vec![("a".into(), "done".into(), 1)]);
}

#[tokio::test]
async fn failed_persist_keeps_the_optimistic_order() {
    let api = FakeApi::new(
        vec![board("b1", "u1", vec![column("todo", &["card1", "card2"])])],
        vec![],
    );
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    // Both the write and the follow-up read fail: the user keeps seeing
    // the result of their gesture rather than a snapped-back board.
    api.fail_moves();
    api.fail_fetches();

    let moved = session
        .move_card(
            "card2",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "card1".into(),
            },
        )
        .await;

    assert!(moved);
    assert_eq!(api.moves().len(), 1);
    assert_eq!(order(&session, "todo"), ["card2", "card1"]);
}

// ── Board lists ────────────────────────────────────────────────

#[tokio::test]
async fn load_boards_partitions_owned_and_shared() {
    let api = FakeApi::new(
        vec![board("mine", "u1", vec![])],
        vec![board("theirs", "u2", vec![])],
    );
    let mut session = session_with(api.clone());

    session.load_boards().await.unwrap();

    let owned: Vec<&str> = session.boards().iter().map(|b| b.id.as_str()).collect();
    let shared: Vec<&str> = session
        .shared_boards()
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(owned, ["mine"]);
    assert_eq!(shared, ["theirs"]);

    assert!(session.is_owner(&session.boards()[0]));
    assert!(!session.is_owner(&session.shared_boards()[0]));
    assert_eq!(api.fetch_list_calls(), 1);
}

#[tokio::test]
async fn load_boards_without_user_clears_lists() {
    let api = FakeApi::new(vec![board("mine", "u1", vec![])], vec![]);
    let mut session = session_with(api.clone());
    session.load_boards().await.unwrap();
    assert_eq!(session.boards().len(), 1);

    session.set_user(None);
    session.load_boards().await.unwrap();

    assert!(session.boards().is_empty());
    assert!(session.shared_boards().is_empty());
    // Signed-out reloads never touch the network.
    assert_eq!(api.fetch_list_calls(), 1);
}

#[tokio::test]
async fn select_board_always_fetches_fresh() {
    let api = FakeApi::new(vec![board("b1", "u1", vec![column("todo", &[])])], vec![]);
    let mut session = session_with(api.clone());
    session.load_boards().await.unwrap();

    // The server gains a card after the list was loaded.
    api.push_card("b1", "todo", card("late", "todo", 0));

    session.select_board("b1").await.unwrap();
    assert_eq!(order(&session, "todo"), ["late"]);
}

#[tokio::test]
async fn create_board_requires_a_signed_in_user() {
    let api = FakeApi::new(vec![], vec![]);
    let mut session = BoardSession::new(api.clone());

    let err = session.create_board("Roadmap").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(session.boards().is_empty());
}

#[tokio::test]
async fn create_board_appears_in_owned_list() {
    let api = FakeApi::new(vec![], vec![]);
    let mut session = session_with(api.clone());

    let board = session.create_board("Roadmap").await.unwrap();
    assert_eq!(board.owner_id, "u1");
    assert_eq!(session.boards().len(), 1);
    assert_eq!(session.boards()[0].title, "Roadmap");
}

#[tokio::test]
async fn delete_board_clears_the_current_board() {
    let api = FakeApi::new(vec![board("b1", "u1", vec![])], vec![]);
    let mut session = session_with(api.clone());
    session.load_boards().await.unwrap();
    session.select_board("b1").await.unwrap();

    session.delete_board("b1").await.unwrap();

    assert!(session.boards().is_empty());
    assert!(session.current_board().is_none());
}

// ── Mutations and reconciliation ───────────────────────────────

#[tokio::test]
async fn add_card_refreshes_the_current_board() {
    let api = FakeApi::new(vec![board("b1", "u1", vec![column("todo", &[])])], vec![]);
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    session.add_card("todo", "Ship it").await.unwrap();

    assert_eq!(order(&session, "todo"), ["todo-card-1"]);
    assert_eq!(api.fetch_board_calls(), 2);
}

#[tokio::test]
async fn blank_titles_are_rejected_before_the_network() {
    let api = FakeApi::new(vec![board("b1", "u1", vec![column("todo", &[])])], vec![]);
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    let err = session.add_card("todo", "   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(api.fetch_board_calls(), 1);
}

#[tokio::test]
async fn share_normalizes_the_email_before_sending() {
    let api = FakeApi::new(vec![board("b1", "u1", vec![])], vec![]);
    let mut session = session_with(api.clone());
    session.load_boards().await.unwrap();

    let response = session.share_board("b1", " Bob@Example.COM ").await.unwrap();
    assert_eq!(response.shared_with, ["bob@example.com"]);

    let err = session.share_board("b1", "not-an-email").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn update_card_patch_is_reflected_after_refresh() {
    let api = FakeApi::new(
        vec![board("b1", "u1", vec![column("todo", &["card1"])])],
        vec![],
    );
    let mut session = session_with(api.clone());
    session.select_board("b1").await.unwrap();

    session
        .update_card(
            "card1",
            CardPatch {
                title: Some("Renamed".into()),
                ..CardPatch::default()
            },
        )
        .await
        .unwrap();

    let board = session.current_board().unwrap();
    assert_eq!(board.find_column("todo").unwrap().cards[0].title, "Renamed");
}
