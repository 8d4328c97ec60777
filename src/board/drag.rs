//! Drag intent classification
//!
//! The gesture layer reports what was picked up and what it was released
//! over. Both are tagged at the source, so no identifier parsing happens
//! here: classification only looks at element kinds and the board state.

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, ColumnId};
use super::state::BoardState;

/// Element picked up at drag start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragSource {
    Card(CardId),
    Column(ColumnId),
}

/// Element under the pointer at release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropTarget {
    Card(CardId),
    Column(ColumnId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragIntent {
    MoveCard { card_id: CardId, to_column: ColumnId },
    ReorderColumns { source: ColumnId, target: ColumnId },
}

/// Classify a finished gesture. Returns None for every no-op case: no
/// target, dropping onto itself, a card onto the column it already sits
/// in, unknown ids, and any kind combination other than card→column or
/// column→column.
pub fn classify(source: DragSource, target: Option<DropTarget>, state: &BoardState) -> Option<DragIntent> {
    match (source, target?) {
        (DragSource::Card(card_id), DropTarget::Column(column_id)) => {
            let card = state.card(card_id)?;
            state.column(column_id)?;
            if card.column_id == column_id {
                return None;
            }
            Some(DragIntent::MoveCard { card_id, to_column: column_id })
        }
        (DragSource::Column(source), DropTarget::Column(target)) => {
            if source == target {
                return None;
            }
            state.column(source)?;
            state.column(target)?;
            Some(DragIntent::ReorderColumns { source, target })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, Column};

    fn state() -> BoardState {
        BoardState::new(
            vec![Column::new(1, 1, "To do", 0), Column::new(2, 1, "Doing", 1)],
            vec![Card::new(10, 1, 1, "write tests")],
        )
    }

    #[test]
    fn test_card_onto_other_column_moves() {
        assert_eq!(
            classify(DragSource::Card(10), Some(DropTarget::Column(2)), &state()),
            Some(DragIntent::MoveCard { card_id: 10, to_column: 2 })
        );
    }

    #[test]
    fn test_card_onto_own_column_is_noop() {
        assert_eq!(classify(DragSource::Card(10), Some(DropTarget::Column(1)), &state()), None);
    }

    #[test]
    fn test_column_onto_column_reorders() {
        assert_eq!(
            classify(DragSource::Column(2), Some(DropTarget::Column(1)), &state()),
            Some(DragIntent::ReorderColumns { source: 2, target: 1 })
        );
    }

    #[test]
    fn test_other_combinations_are_noops() {
        let state = state();
        assert_eq!(classify(DragSource::Column(1), None, &state), None);
        assert_eq!(classify(DragSource::Column(1), Some(DropTarget::Column(1)), &state), None);
        assert_eq!(classify(DragSource::Card(10), Some(DropTarget::Card(10)), &state), None);
        assert_eq!(classify(DragSource::Column(1), Some(DropTarget::Card(10)), &state), None);
        assert_eq!(classify(DragSource::Card(99), Some(DropTarget::Column(2)), &state), None);
        assert_eq!(classify(DragSource::Card(10), Some(DropTarget::Column(99)), &state), None);
    }
}
