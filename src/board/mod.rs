//! Board
//!
//! Everything that happens on an open board:
//! - state: the cached columns and cards
//! - cache: load, add, delete and drag operations against a `BoardStore`
//! - drag: classification of finished gestures into intents
//! - reorder: the two-phase column position rewrite

mod state;
mod cache;
mod drag;
mod reorder;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use state::BoardState;
pub use cache::{Board, DropOutcome, MoveOutcome, ReorderOutcome};
pub use drag::{classify, DragIntent, DragSource, DropTarget};
pub use reorder::{
    array_move, plan_renumber, plan_reorder, rewrite_positions, Phase, ReconcileError, ReorderPlan,
};
