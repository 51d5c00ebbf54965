use crate::domain::Board;

/// Where a dragged card was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on a column body: append to the end of that column.
    Column { column_id: String },
    /// Dropped on another card: insert before it, pushing it and the cards
    /// after it down by one.
    Card { column_id: String, card_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub card_id: String,
    pub source_column_id: String,
    pub target_column_id: String,
    pub target_index: usize,
}

/// Resolves a drag gesture to a concrete `(column, index)` destination.
///
/// Pure: reads the snapshot, never mutates it. Returns `None` when the drop
/// target no longer exists in the snapshot, and for the same-column
/// same-index case where applying the move would change nothing — callers
/// must treat `None` as "do not touch state, do not call the network".
pub fn plan_move(
    board: &Board,
    card_id: &str,
    source_column_id: &str,
    target: &DropTarget,
) -> Option<MovePlan> {
    let (target_column_id, target_index) = match target {
        DropTarget::Column { column_id } => {
            let column = board.find_column(column_id)?;
            (column.id.clone(), column.cards.len())
        }
        DropTarget::Card {
            column_id,
            card_id: target_card_id,
        } => {
            let column = board.find_column(column_id)?;
            let index = column.cards.iter().position(|c| &c.id == target_card_id)?;
            (column.id.clone(), index)
        }
    };

    if target_column_id == source_column_id {
        let current_index = board
            .find_column(source_column_id)
            .and_then(|col| col.cards.iter().position(|c| c.id == card_id));
        if current_index == Some(target_index) {
            return None;
        }
    }

    Some(MovePlan {
        card_id: card_id.to_string(),
        source_column_id: source_column_id.to_string(),
        target_column_id,
        target_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, Column};

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

    fn board() -> Board {
        Board {
            id: "b1".into(),
            title: "Board".into(),
            owner_id: "u1".into(),
            shared_with: vec![],
            columns: vec![
                Column {
                    id: "todo".into(),
                    title: "Todo".into(),
                    cards: vec![card("a", "todo", 0), card("b", "todo", 1)],
                    created_at: "2024-01-01T00:00:00Z".into(),
                },
                Column {
                    id: "done".into(),
                    title: "Done".into(),
                    cards: vec![],
                    created_at: "2024-01-01T00:00:00Z".into(),
                },
            ],
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn drop_on_column_appends() {
        let board = board();
        let plan = plan_move(
            &board,
            "a",
            "todo",
            &DropTarget::Column {
                column_id: "done".into(),
            },
        )
        .unwrap();

        assert_eq!(plan.target_column_id, "done");
        assert_eq!(plan.target_index, 0);
    }

    #[test]
    fn drop_on_card_inserts_before_it() {
        let board = board();
        let plan = plan_move(
            &board,
            "b",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "a".into(),
            },
        )
        .unwrap();

        assert_eq!(plan.target_column_id, "todo");
        assert_eq!(plan.target_index, 0);
    }

    #[test]
    fn drop_on_self_is_a_noop() {
        let board = board();
        let plan = plan_move(
            &board,
            "a",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "a".into(),
            },
        );

        assert!(plan.is_none());
    }

    #[test]
    fn vanished_target_is_a_noop() {
        let board = board();
        assert!(plan_move(
            &board,
            "a",
            "todo",
            &DropTarget::Column {
                column_id: "gone".into()
            }
        )
        .is_none());
        assert!(plan_move(
            &board,
            "a",
            "todo",
            &DropTarget::Card {
                column_id: "todo".into(),
                card_id: "gone".into()
            }
        )
        .is_none());
    }

    #[test]
    fn planning_is_deterministic_and_does_not_touch_the_snapshot() {
        let board = board();
        let before = board.clone();
        let target = DropTarget::Column {
            column_id: "done".into(),
        };

        let first = plan_move(&board, "a", "todo", &target);
        let second = plan_move(&board, "a", "todo", &target);

        assert_eq!(first, second);
        assert_eq!(board, before);
    }
}
