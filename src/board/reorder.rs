//! Position Reconciler
//!
//! Turns a column move into a new order and persists it as a two-phase
//! position rewrite:
//!
//! 1. quarantine: every column gets `-(rank + 1)`, which no final position
//!    can collide with;
//! 2. commit: every column gets its zero-based rank.
//!
//! The store offers no multi-row transaction, so this is what keeps two
//! columns from ever holding the same final position mid-rewrite. Writes in
//! a phase are fanned out together and all of them are awaited, even when a
//! sibling fails.

use futures::future::join_all;
use std::fmt;

use crate::domain::{Column, ColumnId, StoreError};
use crate::repository::BoardStore;

/// Stable array move: take the element at `from` out and reinsert it at `to`.
/// Everything else keeps its relative order. Out-of-range `from` is a no-op
/// and `to` is clamped to the last index.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Target column order for one rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub order: Vec<ColumnId>,
}

impl ReorderPlan {
    pub fn new(order: Vec<ColumnId>) -> Self {
        Self { order }
    }

    /// Phase 1 writes: pairwise distinct and strictly negative
    pub fn quarantine_writes(&self) -> Vec<(ColumnId, i32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, id)| (*id, -(rank as i32 + 1)))
            .collect()
    }

    /// Phase 2 writes: final zero-based ranks
    pub fn commit_writes(&self) -> Vec<(ColumnId, i32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, id)| (*id, rank as i32))
            .collect()
    }
}

/// Plan for dragging column `source` onto column `target`.
/// None when either is unknown or they are the same column.
pub fn plan_reorder(columns: &[Column], source: ColumnId, target: ColumnId) -> Option<ReorderPlan> {
    if source == target {
        return None;
    }
    let from = columns.iter().position(|c| c.id == source)?;
    let to = columns.iter().position(|c| c.id == target)?;

    let mut order: Vec<ColumnId> = columns.iter().map(|c| c.id).collect();
    array_move(&mut order, from, to);
    Some(ReorderPlan::new(order))
}

/// Plan that closes gaps in `columns` (already in display order).
/// None when positions are already exactly `0..N-1`.
pub fn plan_renumber(columns: &[Column]) -> Option<ReorderPlan> {
    let dense = columns
        .iter()
        .enumerate()
        .all(|(rank, c)| c.position == rank as i32);
    if dense {
        return None;
    }
    Some(ReorderPlan::new(columns.iter().map(|c| c.id).collect()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Quarantine,
    Commit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Quarantine => write!(f, "quarantine"),
            Phase::Commit => write!(f, "commit"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{phase} phase failed for {} column(s)", .failures.len())]
pub struct ReconcileError {
    pub phase: Phase,
    pub failures: Vec<(ColumnId, StoreError)>,
}

/// Persist `plan`: quarantine phase, then commit phase.
/// The commit phase is not started when any quarantine write failed.
pub async fn rewrite_positions<S>(store: &S, plan: &ReorderPlan) -> Result<(), ReconcileError>
where
    S: BoardStore + ?Sized,
{
    run_phase(store, Phase::Quarantine, plan.quarantine_writes()).await?;
    run_phase(store, Phase::Commit, plan.commit_writes()).await
}

async fn run_phase<S>(store: &S, phase: Phase, writes: Vec<(ColumnId, i32)>) -> Result<(), ReconcileError>
where
    S: BoardStore + ?Sized,
{
    let pending = writes.into_iter().map(|(column_id, position)| async move {
        (column_id, store.update_column_position(column_id, position).await)
    });

    let failures: Vec<(ColumnId, StoreError)> = join_all(pending)
        .await
        .into_iter()
        .filter_map(|(column_id, result)| result.err().map(|e| (column_id, e)))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError { phase, failures })
    }
}
