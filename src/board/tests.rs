//! Board cache and reconciler tests against an in-memory SQLite store.

use std::collections::HashMap;

use super::test_support::{seeded_store, FailOn, Hold, Write, DECK};
use super::*;
use crate::domain::ColumnId;
use crate::error::BoardError;
use crate::repository::BoardStore;

/// Positions as persisted in the store, keyed by column id
async fn stored_positions<S: BoardStore + ?Sized>(store: &S) -> HashMap<ColumnId, i32> {
    store
        .list_columns(DECK)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.position))
        .collect()
}

fn assert_dense(positions: &HashMap<ColumnId, i32>) {
    let mut values: Vec<i32> = positions.values().copied().collect();
    values.sort();
    let expected: Vec<i32> = (0..positions.len() as i32).collect();
    assert_eq!(values, expected);
}

#[tokio::test]
async fn test_load_orders_columns_and_collects_cards() {
    let (store, columns) = seeded_store(&["To do", "Doing", "Done"]).await;
    store.inner.insert_card(DECK, columns[2].id, "ship").await.unwrap();
    store.inner.insert_card(DECK, columns[0].id, "plan").await.unwrap();

    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);

    let state = board.snapshot();
    assert_eq!(state.column_order(), vec![columns[0].id, columns[1].id, columns[2].id]);
    assert_eq!(state.cards.len(), 2);
    assert_eq!(state.cards_in(columns[0].id)[0].title, "plan");
}

#[tokio::test]
async fn test_load_failure_leaves_cache_empty() {
    let (store, columns) = seeded_store(&["To do"]).await;
    store.inner.insert_card(DECK, columns[0].id, "plan").await.unwrap();
    store.fail_on(FailOn::ListCards);

    let board = Board::new(store.clone(), DECK);
    assert!(!board.load().await);
    assert!(board.snapshot().is_empty());
}

#[tokio::test]
async fn test_load_column_failure_leaves_cache_empty() {
    let (store, _) = seeded_store(&["To do"]).await;
    store.fail_on(FailOn::ListColumns);

    let board = Board::new(store.clone(), DECK);
    assert!(!board.load().await);
    assert!(board.snapshot().is_empty());
}

#[tokio::test]
async fn test_add_column_appends_at_count() {
    let (store, _) = seeded_store(&["To do", "Doing"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    let column = board.add_column("  Done ").await.unwrap();
    assert_eq!(column.name, "Done");
    assert_eq!(column.position, 2);
    assert_eq!(board.snapshot().columns.last().unwrap().id, column.id);
    assert_eq!(store.writes(), vec![Write::InsertColumn { position: 2 }]);
}

#[tokio::test]
async fn test_add_column_rejects_blank_name_without_writing() {
    let (store, _) = seeded_store(&[]).await;
    let board = Board::new(store.clone(), DECK);

    let err = board.add_column("   ").await.unwrap_err();
    assert!(matches!(err, BoardError::InvalidInput(_)));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_add_column_failure_keeps_cache() {
    let (store, _) = seeded_store(&["To do"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    store.fail_on(FailOn::InsertColumn);

    let err = board.add_column("Doing").await.unwrap_err();
    assert!(matches!(err, BoardError::Store(_)));
    assert_eq!(board.snapshot().columns.len(), 1);
}

#[tokio::test]
async fn test_add_card_to_known_column() {
    let (store, columns) = seeded_store(&["To do"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    let card = board.add_card(columns[0].id, "write docs").await.unwrap();
    assert_eq!(card.column_id, columns[0].id);
    assert_eq!(card.deck_id, DECK);
    assert_eq!(board.snapshot().cards_in(columns[0].id).len(), 1);

    let err = board.add_card(999, "lost").await.unwrap_err();
    assert!(matches!(err, BoardError::ColumnNotFound(999)));
}

#[tokio::test]
async fn test_reorder_scenario_last_column_to_front() {
    let (store, columns) = seeded_store(&["To do", "Doing", "Done"]).await;
    let (todo, doing, done) = (columns[0].id, columns[1].id, columns[2].id);
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    let outcome = board.reorder_columns(done, todo).await;
    assert_eq!(outcome, ReorderOutcome::Reordered);

    // Every quarantine write lands before any commit write
    let writes = store.position_writes();
    assert_eq!(writes.len(), 6);
    let (quarantine, commit) = writes.split_at(3);
    let quarantine: HashMap<ColumnId, i32> = quarantine.iter().copied().collect();
    let commit: HashMap<ColumnId, i32> = commit.iter().copied().collect();
    assert_eq!(quarantine, HashMap::from([(done, -1), (todo, -2), (doing, -3)]));
    assert_eq!(commit, HashMap::from([(done, 0), (todo, 1), (doing, 2)]));

    assert_eq!(
        stored_positions(store.as_ref()).await,
        HashMap::from([(todo, 1), (doing, 2), (done, 0)])
    );
    assert_eq!(board.snapshot().column_order(), vec![done, todo, doing]);
}

#[tokio::test]
async fn test_reorder_onto_self_writes_nothing() {
    let (store, columns) = seeded_store(&["To do", "Doing"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    assert_eq!(board.reorder_columns(columns[0].id, columns[0].id).await, ReorderOutcome::Unchanged);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_reorder_quarantine_failure_skips_commit_and_rolls_back() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    let before = board.snapshot();
    store.fail_on(FailOn::Quarantine);

    let outcome = board.reorder_columns(columns[0].id, columns[2].id).await;
    assert_eq!(outcome, ReorderOutcome::RolledBack);
    assert_eq!(board.snapshot(), before);
    assert!(store.position_writes().iter().all(|(_, p)| *p < 0));
}

#[tokio::test]
async fn test_reorder_commit_failure_awaits_every_write_and_rolls_back() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    let before = board.snapshot();
    store.fail_on(FailOn::CommitOf(columns[1].id));

    let outcome = board.reorder_columns(columns[0].id, columns[2].id).await;
    assert_eq!(outcome, ReorderOutcome::RolledBack);
    assert_eq!(board.snapshot(), before);

    let commits = store.position_writes().into_iter().filter(|(_, p)| *p >= 0).count();
    assert_eq!(commits, 3);
}

#[tokio::test]
async fn test_move_card_reassigns_column() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    let card = store.inner.insert_card(DECK, columns[0].id, "task").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    assert_eq!(board.move_card(card.id, columns[1].id).await, MoveOutcome::Moved);

    let cached = board.snapshot().card(card.id).cloned().unwrap();
    assert_eq!(cached.column_id, columns[1].id);
    assert_eq!(cached.deck_id, DECK);

    let stored = store.inner.list_cards_by_columns(&[columns[1].id]).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].deck_id, DECK);
}

#[tokio::test]
async fn test_move_card_failure_rolls_back() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    let card = store.inner.insert_card(DECK, columns[0].id, "task").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    store.fail_on(FailOn::CardColumn);

    assert_eq!(board.move_card(card.id, columns[1].id).await, MoveOutcome::RolledBack);
    assert_eq!(board.snapshot().card(card.id).unwrap().column_id, columns[0].id);
}

#[tokio::test]
async fn test_drop_card_on_own_column_is_idempotent() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    let card = store.inner.insert_card(DECK, columns[0].id, "task").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    let before = board.snapshot();

    let outcome = board
        .handle_drop(DragSource::Card(card.id), Some(DropTarget::Column(columns[0].id)))
        .await;
    assert_eq!(outcome, DropOutcome::Ignored);
    assert_eq!(board.snapshot(), before);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_handle_drop_dispatches_intents() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    let card = store.inner.insert_card(DECK, columns[0].id, "task").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    let moved = board
        .handle_drop(DragSource::Card(card.id), Some(DropTarget::Column(columns[1].id)))
        .await;
    assert_eq!(moved, DropOutcome::Card(MoveOutcome::Moved));

    let reordered = board
        .handle_drop(DragSource::Column(columns[1].id), Some(DropTarget::Column(columns[0].id)))
        .await;
    assert_eq!(reordered, DropOutcome::Columns(ReorderOutcome::Reordered));

    assert_eq!(board.handle_drop(DragSource::Card(card.id), None).await, DropOutcome::Ignored);
}

#[tokio::test]
async fn test_delete_column_removes_cards_first() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    store.inner.insert_card(DECK, columns[0].id, "c1").await.unwrap();
    store.inner.insert_card(DECK, columns[0].id, "c2").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    board.delete_column(columns[0].id).await.unwrap();

    let writes = store.writes();
    assert_eq!(writes[0], Write::DeleteCards { column_id: columns[0].id });
    assert_eq!(writes[1], Write::DeleteColumn { column_id: columns[0].id });

    let state = board.snapshot();
    assert_eq!(state.column_order(), vec![columns[1].id]);
    assert!(state.cards.is_empty());
}

#[tokio::test]
async fn test_delete_column_card_failure_changes_nothing() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    store.inner.insert_card(DECK, columns[0].id, "c1").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    let before = board.snapshot();
    store.fail_on(FailOn::DeleteCards);

    assert!(board.delete_column(columns[0].id).await.is_err());
    assert!(!store.writes().contains(&Write::DeleteColumn { column_id: columns[0].id }));
    assert_eq!(board.snapshot(), before);
}

#[tokio::test]
async fn test_delete_column_second_step_failure_keeps_cache() {
    let (store, columns) = seeded_store(&["To do"]).await;
    store.inner.insert_card(DECK, columns[0].id, "c1").await.unwrap();
    let board = Board::new(store.clone(), DECK);
    board.load().await;
    let before = board.snapshot();
    store.fail_on(FailOn::DeleteColumn);

    assert!(board.delete_column(columns[0].id).await.is_err());
    assert_eq!(board.snapshot(), before);
}

#[tokio::test]
async fn test_positions_stay_dense_across_add_reorder_delete() {
    let (store, _) = seeded_store(&[]).await;
    let board = Board::new(store.clone(), DECK);
    board.load().await;

    let a = board.add_column("A").await.unwrap();
    let b = board.add_column("B").await.unwrap();
    let c = board.add_column("C").await.unwrap();
    assert_dense(&stored_positions(store.as_ref()).await);

    board.reorder_columns(a.id, c.id).await;
    assert_dense(&stored_positions(store.as_ref()).await);

    // Deleting a middle column closes the gap, so the next add cannot collide
    board.delete_column(c.id).await.unwrap();
    assert_dense(&stored_positions(store.as_ref()).await);

    let d = board.add_column("D").await.unwrap();
    assert_eq!(d.position, 2);
    assert_dense(&stored_positions(store.as_ref()).await);

    let cached: Vec<i32> = board.snapshot().columns.iter().map(|c| c.position).collect();
    assert_eq!(cached, vec![0, 1, 2]);
    assert_eq!(board.snapshot().column_order(), vec![b.id, a.id, d.id]);
}

#[tokio::test]
async fn test_reload_closes_gap_left_by_failed_renumber() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    let (b, c) = (columns[1].id, columns[2].id);
    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);

    store.fail_on(FailOn::Quarantine);
    board.delete_column(columns[0].id).await.unwrap();
    assert_eq!(stored_positions(store.as_ref()).await, HashMap::from([(b, 1), (c, 2)]));

    store.clear_failures();
    let reloaded = Board::new(store.clone(), DECK);
    assert!(reloaded.load().await);
    assert_eq!(stored_positions(store.as_ref()).await, HashMap::from([(b, 0), (c, 1)]));

    let d = reloaded.add_column("D").await.unwrap();
    assert_eq!(d.position, 2);
    assert_eq!(reloaded.snapshot().column_order(), vec![b, c, d.id]);
    assert_dense(&stored_positions(store.as_ref()).await);
}

#[tokio::test]
async fn test_add_column_closes_gap_before_inserting() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);

    store.fail_on(FailOn::Quarantine);
    board.delete_column(columns[0].id).await.unwrap();
    store.clear_failures();
    store.clear_writes();

    let d = board.add_column("D").await.unwrap();
    assert_eq!(d.position, 2);
    assert_eq!(store.position_writes().len(), 4);
    assert_eq!(store.writes().last(), Some(&Write::InsertColumn { position: 2 }));
    assert_dense(&stored_positions(store.as_ref()).await);

    let cached: Vec<i32> = board.snapshot().columns.iter().map(|c| c.position).collect();
    assert_eq!(cached, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_load_succeeds_when_gap_cannot_be_closed() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    store.inner.delete_column(columns[0].id).await.unwrap();
    store.fail_on(FailOn::Quarantine);

    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);

    let state = board.snapshot();
    assert_eq!(state.column_order(), vec![columns[1].id, columns[2].id]);
    let cached: Vec<i32> = state.columns.iter().map(|c| c.position).collect();
    assert_eq!(cached, vec![1, 2]);
}

#[tokio::test]
async fn test_move_card_shows_before_store_confirms() {
    let (store, columns) = seeded_store(&["To do", "Done"]).await;
    let (todo, done) = (columns[0].id, columns[1].id);
    let card_id = store.inner.insert_card(DECK, todo, "task").await.unwrap().id;
    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);
    store.hold(Hold::CardColumn);

    let pending = tokio::spawn({
        let board = board.clone();
        async move { board.move_card(card_id, done).await }
    });
    store.wait_for_writes(1).await;

    assert_eq!(board.snapshot().card(card_id).unwrap().column_id, done);
    assert_eq!(store.inner.list_cards_by_columns(&[todo]).await.unwrap().len(), 1);

    store.release(Hold::CardColumn, 1);
    assert_eq!(pending.await.unwrap(), MoveOutcome::Moved);
    assert_eq!(store.inner.list_cards_by_columns(&[done]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_move_does_not_undo_a_later_move() {
    let (store, columns) = seeded_store(&["To do", "Doing", "Done"]).await;
    let (todo, doing, done) = (columns[0].id, columns[1].id, columns[2].id);
    let card_id = store.inner.insert_card(DECK, todo, "task").await.unwrap().id;
    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);
    store.hold(Hold::CardColumn);

    let first = tokio::spawn({
        let board = board.clone();
        async move { board.move_card(card_id, doing).await }
    });
    store.wait_for_writes(1).await;
    let second = tokio::spawn({
        let board = board.clone();
        async move { board.move_card(card_id, done).await }
    });
    store.wait_for_writes(2).await;
    assert_eq!(board.snapshot().card(card_id).unwrap().column_id, done);

    store.fail_on(FailOn::CardColumn);
    store.release(Hold::CardColumn, 1);
    assert_eq!(first.await.unwrap(), MoveOutcome::RolledBack);
    assert_eq!(board.snapshot().card(card_id).unwrap().column_id, done);

    store.clear_failures();
    store.release(Hold::CardColumn, 1);
    assert_eq!(second.await.unwrap(), MoveOutcome::Moved);
    assert_eq!(board.snapshot().card(card_id).unwrap().column_id, done);
    assert_eq!(store.inner.list_cards_by_columns(&[done]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_reorder_does_not_undo_a_later_reorder() {
    let (store, columns) = seeded_store(&["A", "B", "C"]).await;
    let (a, b, c) = (columns[0].id, columns[1].id, columns[2].id);
    let board = Board::new(store.clone(), DECK);
    assert!(board.load().await);
    store.hold(Hold::Positions);

    let first = tokio::spawn({
        let board = board.clone();
        async move { board.reorder_columns(c, a).await }
    });
    store.wait_for_writes(3).await;

    // New order is shown while the quarantine writes are still in flight
    assert_eq!(board.snapshot().column_order(), vec![c, a, b]);
    assert_eq!(stored_positions(&store.inner).await, HashMap::from([(a, 0), (b, 1), (c, 2)]));

    let second = tokio::spawn({
        let board = board.clone();
        async move { board.reorder_columns(b, c).await }
    });
    store.wait_for_writes(6).await;
    assert_eq!(board.snapshot().column_order(), vec![b, c, a]);

    store.fail_on(FailOn::Quarantine);
    store.release(Hold::Positions, 3);
    assert_eq!(first.await.unwrap(), ReorderOutcome::RolledBack);
    assert_eq!(board.snapshot().column_order(), vec![b, c, a]);

    store.clear_failures();
    store.release(Hold::Positions, 6);
    assert_eq!(second.await.unwrap(), ReorderOutcome::Reordered);
    assert_eq!(board.snapshot().column_order(), vec![b, c, a]);
    assert_eq!(stored_positions(store.as_ref()).await, HashMap::from([(b, 0), (c, 1), (a, 2)]));
}
