//! In-memory view of one open board: its columns in display order and its
//! cards in insertion order. All mutations here are local and synchronous.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, CardId, Column, ColumnId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    /// Sorted by position ascending
    pub columns: Vec<Column>,
    pub cards: Vec<Card>,
}

impl BoardState {
    pub fn new(mut columns: Vec<Column>, cards: Vec<Card>) -> Self {
        columns.sort_by_key(|c| c.position);
        Self { columns, cards }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.cards.is_empty()
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Column ids in display order
    pub fn column_order(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id).collect()
    }

    /// Cards of one column, in insertion order
    pub fn cards_in(&self, column_id: ColumnId) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.column_id == column_id).collect()
    }

    /// Remove a column and every card in it
    pub(crate) fn remove_column(&mut self, column_id: ColumnId) {
        self.columns.retain(|c| c.id != column_id);
        self.cards.retain(|c| c.column_id != column_id);
    }

    /// Rearrange columns to follow `order` and set each position to its rank.
    /// Ids missing from `order` keep their relative order at the end.
    pub(crate) fn apply_order(&mut self, order: &[ColumnId]) {
        let rank = |id: ColumnId| order.iter().position(|o| *o == id).unwrap_or(usize::MAX);
        self.columns.sort_by_key(|c| rank(c.id));
        for (position, column) in self.columns.iter_mut().enumerate() {
            column.position = position as i32;
        }
    }
}
