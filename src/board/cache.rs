//! Board State Cache
//!
//! Client-side copy of one open board, kept in sync with the store by an
//! initial `load` and local mutation afterwards. The store stays the
//! system of record; the cache is dropped with the board view.
//!
//! Failure policy for drag operations is optimistic with rollback: the new
//! state is applied at once, and restored if any write fails, unless a later
//! operation has already replaced what this one wrote.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Card, CardId, Column, ColumnId, DeckId};
use crate::error::{require_text, BoardError, BoardResult};
use crate::repository::BoardStore;
use super::drag::{classify, DragIntent, DragSource, DropTarget};
use super::reorder::{plan_renumber, plan_reorder, rewrite_positions};
use super::state::BoardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Unknown card or column, or the card is already there; nothing written
    Unchanged,
    /// The store rejected the move and the card went back
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Reordered,
    Unchanged,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Ignored,
    Card(MoveOutcome),
    Columns(ReorderOutcome),
}

/// One open board bound to its store. Cloning shares the same cache.
pub struct Board<S: BoardStore + ?Sized> {
    store: Arc<S>,
    deck_id: DeckId,
    state: Arc<Mutex<BoardState>>,
}

impl<S: BoardStore + ?Sized> Clone for Board<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            deck_id: self.deck_id,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: BoardStore + ?Sized> Board<S> {
    pub fn new(store: Arc<S>, deck_id: DeckId) -> Self {
        Self {
            store,
            deck_id,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    /// Copy of the current cache
    pub fn snapshot(&self) -> BoardState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the cache. The lock never outlives this call, so it
    /// is never held across a store request.
    fn with_state<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> R {
        let mut guard = self.lock_state();
        f(&mut guard)
    }

    /// Rebuild the cache from the store: columns by position, then every
    /// card in those columns. Any fetch error is logged and leaves the cache
    /// empty. Position gaps found on load are closed. Returns whether the
    /// board loaded.
    pub async fn load(&self) -> bool {
        self.with_state(|state| *state = BoardState::default());

        let columns = match self.store.list_columns(self.deck_id).await {
            Ok(columns) => columns,
            Err(e) => {
                log::error!("Failed to load columns for deck {}: {}", self.deck_id, e);
                return false;
            }
        };

        let column_ids: Vec<ColumnId> = columns.iter().map(|c| c.id).collect();
        let cards = match self.store.list_cards_by_columns(&column_ids).await {
            Ok(cards) => cards,
            Err(e) => {
                log::error!("Failed to load cards for deck {}: {}", self.deck_id, e);
                return false;
            }
        };

        log::info!(
            "Loaded deck {}: {} columns, {} cards",
            self.deck_id,
            columns.len(),
            cards.len()
        );
        self.with_state(|state| *state = BoardState::new(columns, cards));
        self.close_gaps("on load").await;
        true
    }

    /// Rewrite column positions to `0..N-1` when the cached ones have gaps,
    /// using the same two-phase write as a reorder. A failure is logged and
    /// the cache keeps its old positions.
    async fn close_gaps(&self, context: &str) {
        let columns = self.with_state(|state| state.columns.clone());
        let Some(plan) = plan_renumber(&columns) else {
            return;
        };

        match rewrite_positions(self.store.as_ref(), &plan).await {
            Ok(()) => {
                log::info!("Renumbered columns of deck {} {}", self.deck_id, context);
                self.with_state(|state| {
                    if state.column_order() == plan.order {
                        state.apply_order(&plan.order);
                    }
                });
            }
            Err(e) => log::error!(
                "Failed to renumber columns of deck {} {}: {}",
                self.deck_id,
                context,
                e
            ),
        }
    }

    /// Append a column at the end. Gaps left by an earlier failed renumber
    /// are closed first so the new position is free. The cache only gets
    /// the column once the store has accepted the insert.
    pub async fn add_column(&self, name: &str) -> BoardResult<Column> {
        let name = require_text(name, "Column name")?;
        self.close_gaps("before add").await;
        let position = self.with_state(|state| state.columns.len() as i32);

        let column = self
            .store
            .insert_column(self.deck_id, &name, position)
            .await
            .map_err(|e| {
                log::error!("Failed to add column to deck {}: {}", self.deck_id, e);
                BoardError::from(e)
            })?;

        self.with_state(|state| state.columns.push(column.clone()));
        Ok(column)
    }

    pub async fn add_card(&self, column_id: ColumnId, title: &str) -> BoardResult<Card> {
        let title = require_text(title, "Card title")?;
        if self.with_state(|state| state.column(column_id).is_none()) {
            return Err(BoardError::ColumnNotFound(column_id));
        }

        let card = self
            .store
            .insert_card(self.deck_id, column_id, &title)
            .await
            .map_err(|e| {
                log::error!("Failed to add card to column {}: {}", column_id, e);
                BoardError::from(e)
            })?;

        self.with_state(|state| state.cards.push(card.clone()));
        Ok(card)
    }

    /// Delete a column's cards, then the column. The cache changes only
    /// when both deletes succeed. Remaining columns are then renumbered to
    /// `0..N-1`; a failed renumber is logged and does not fail the delete,
    /// the next load or add closes the gap.
    pub async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()> {
        if self.with_state(|state| state.column(column_id).is_none()) {
            return Err(BoardError::ColumnNotFound(column_id));
        }

        if let Err(e) = self.store.delete_cards_by_column(column_id).await {
            log::error!("Failed to delete cards of column {}: {}", column_id, e);
            return Err(e.into());
        }
        if let Err(e) = self.store.delete_column(column_id).await {
            log::error!("Failed to delete column {}: {}", column_id, e);
            return Err(e.into());
        }

        self.with_state(|state| state.remove_column(column_id));
        self.close_gaps("after delete").await;
        Ok(())
    }

    /// Move a card to another column. Applied locally first; reverted when
    /// the store rejects it.
    pub async fn move_card(&self, card_id: CardId, to_column: ColumnId) -> MoveOutcome {
        let previous = self.with_state(|state| {
            state.column(to_column)?;
            let card = state.card_mut(card_id)?;
            if card.column_id == to_column {
                return None;
            }
            Some(std::mem::replace(&mut card.column_id, to_column))
        });
        let Some(previous) = previous else {
            return MoveOutcome::Unchanged;
        };

        match self.store.update_card_column(card_id, to_column).await {
            Ok(()) => {
                log::debug!("Moved card {} from column {} to {}", card_id, previous, to_column);
                MoveOutcome::Moved
            }
            Err(e) => {
                log::error!("Failed to move card {} to column {}: {}", card_id, to_column, e);
                self.with_state(|state| {
                    if let Some(card) = state.card_mut(card_id) {
                        if card.column_id == to_column {
                            card.column_id = previous;
                        }
                    }
                });
                MoveOutcome::RolledBack
            }
        }
    }

    /// Move column `source` to the slot of column `target` (array-move
    /// semantics) and persist the new positions.
    pub async fn reorder_columns(&self, source: ColumnId, target: ColumnId) -> ReorderOutcome {
        let planned = self.with_state(|state| {
            let plan = plan_reorder(&state.columns, source, target)?;
            let previous = state.columns.clone();
            state.apply_order(&plan.order);
            Some((plan, previous))
        });
        let Some((plan, previous)) = planned else {
            return ReorderOutcome::Unchanged;
        };

        match rewrite_positions(self.store.as_ref(), &plan).await {
            Ok(()) => {
                log::info!("Reordered columns of deck {}: {:?}", self.deck_id, plan.order);
                ReorderOutcome::Reordered
            }
            Err(e) => {
                log::error!("Failed to reorder columns of deck {}: {}", self.deck_id, e);
                for (column_id, cause) in &e.failures {
                    log::debug!("  column {}: {}", column_id, cause);
                }
                self.with_state(|state| {
                    if state.column_order() == plan.order {
                        state.columns = previous;
                    }
                });
                ReorderOutcome::RolledBack
            }
        }
    }

    /// Entry point for the gesture layer
    pub async fn handle_drop(&self, source: DragSource, target: Option<DropTarget>) -> DropOutcome {
        let intent = self.with_state(|state| classify(source, target, state));
        match intent {
            None => DropOutcome::Ignored,
            Some(DragIntent::MoveCard { card_id, to_column }) => {
                DropOutcome::Card(self.move_card(card_id, to_column).await)
            }
            Some(DragIntent::ReorderColumns { source, target }) => {
                DropOutcome::Columns(self.reorder_columns(source, target).await)
            }
        }
    }
}
