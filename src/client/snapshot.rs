use crate::client::planner::MovePlan;
use crate::domain::Board;

/// Applies a planned move to the local snapshot.
///
/// Within one column the card is removed first and then inserted into the
/// already-shortened sequence — that is what makes the planner's index line
/// up when a card moves to a later position in its own column. Across
/// columns the card's owning-column id is rewritten before insertion.
///
/// Returns `false` without mutating anything when the dragged card or the
/// target column is missing from the snapshot; that is a consistency
/// violation, so it is logged and swallowed rather than propagated.
pub fn apply_move(board: &mut Board, plan: &MovePlan) -> bool {
    let Some((source_column_id, card_index)) = board.locate_card(&plan.card_id) else {
        tracing::warn!(
            card_id = plan.card_id.as_str(),
            "Dragged card not found in snapshot, ignoring move"
        );
        return false;
    };
    let source_column_id = source_column_id.to_string();

    let Some(source_idx) = board.columns.iter().position(|c| c.id == source_column_id) else {
        return false;
    };
    let Some(target_idx) = board
        .columns
        .iter()
        .position(|c| c.id == plan.target_column_id)
    else {
        tracing::warn!(
            column_id = plan.target_column_id.as_str(),
            "Target column not found in snapshot, ignoring move"
        );
        return false;
    };

    if source_idx == target_idx {
        let column = &mut board.columns[source_idx];
        let card = column.cards.remove(card_index);
        let index = plan.target_index.min(column.cards.len());
        column.cards.insert(index, card);
        column.renumber();
    } else {
        let mut card = board.columns[source_idx].cards.remove(card_index);
        board.columns[source_idx].renumber();

        card.column_id = plan.target_column_id.clone();

        let target = &mut board.columns[target_idx];
        let index = plan.target_index.min(target.cards.len());
        target.cards.insert(index, card);
        target.renumber();
    }

    true
}
