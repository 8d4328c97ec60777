//! Test store: SQLite underneath, with a log of every write attempt,
//! per-operation failure injection and gates that hold writes in flight.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::domain::{
    Card, CardId, Column, ColumnId, Deck, DeckId, Role, StoreError, StoreResult, User,
};
use crate::repository::{
    init_db, BoardStore, DeckRepository, Repository, SqliteBoardStore, UserRepository,
};

pub const DECK: DeckId = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    InsertColumn { position: i32 },
    ColumnPosition { column_id: ColumnId, position: i32 },
    DeleteCards { column_id: ColumnId },
    DeleteColumn { column_id: ColumnId },
    InsertCard { column_id: ColumnId },
    CardColumn { card_id: CardId, column_id: ColumnId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOn {
    ListColumns,
    ListCards,
    InsertColumn,
    DeleteCards,
    DeleteColumn,
    InsertCard,
    CardColumn,
    /// Any position write with a negative value
    Quarantine,
    /// Position writes of this one column with a non-negative value
    CommitOf(ColumnId),
}

/// Write kinds that can be held until the test releases them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hold {
    CardColumn,
    Positions,
}

pub struct ScriptedStore {
    pub inner: SqliteBoardStore,
    writes: Mutex<Vec<Write>>,
    failures: Mutex<HashSet<FailOn>>,
    holds: Mutex<HashMap<Hold, Arc<Semaphore>>>,
}

impl ScriptedStore {
    pub fn fail_on(&self, failure: FailOn) {
        self.failures.lock().unwrap().insert(failure);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// From now on, writes of this kind are recorded and then wait for
    /// `release`. Failures are decided after the wait.
    pub fn hold(&self, hold: Hold) {
        self.holds.lock().unwrap().insert(hold, Arc::new(Semaphore::new(0)));
    }

    /// Let `count` held writes through, oldest first
    pub fn release(&self, hold: Hold, count: usize) {
        if let Some(gate) = self.holds.lock().unwrap().get(&hold) {
            gate.add_permits(count);
        }
    }

    /// Yield until at least `count` writes have been recorded
    pub async fn wait_for_writes(&self, count: usize) {
        while self.writes.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    async fn pass(&self, hold: Hold) {
        let gate = self.holds.lock().unwrap().get(&hold).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }

    /// Position writes only, in the order they were issued
    pub fn position_writes(&self) -> Vec<(ColumnId, i32)> {
        self.writes()
            .into_iter()
            .filter_map(|w| match w {
                Write::ColumnPosition { column_id, position } => Some((column_id, position)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, write: Write) {
        self.writes.lock().unwrap().push(write);
    }

    fn check(&self, failure: FailOn) -> StoreResult<()> {
        if self.failures.lock().unwrap().contains(&failure) {
            return Err(StoreError::Internal(format!("injected failure: {:?}", failure)));
        }
        Ok(())
    }
}

/// Store seeded with columns named `names` at positions 0.. in deck `DECK`
pub async fn seeded_store(names: &[&str]) -> (Arc<ScriptedStore>, Vec<Column>) {
    let db = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
    let owner = UserRepository::new(db.conn.clone())
        .create(&User::new(0, "owner", "Owner", Role::Limited))
        .await
        .unwrap();
    let deck = DeckRepository::new(db.conn.clone())
        .create(&Deck::new(0, owner.id, 1, "Board"))
        .await
        .unwrap();
    assert_eq!(deck.id, DECK);

    let inner = SqliteBoardStore::new(db.conn.clone());

    let mut columns = Vec::new();
    for (position, name) in names.iter().enumerate() {
        columns.push(inner.insert_column(DECK, name, position as i32).await.unwrap());
    }

    let store = ScriptedStore {
        inner,
        writes: Mutex::new(Vec::new()),
        failures: Mutex::new(HashSet::new()),
        holds: Mutex::new(HashMap::new()),
    };
    (Arc::new(store), columns)
}

#[async_trait]
impl BoardStore for ScriptedStore {
    async fn list_columns(&self, deck_id: DeckId) -> StoreResult<Vec<Column>> {
        self.check(FailOn::ListColumns)?;
        self.inner.list_columns(deck_id).await
    }

    async fn insert_column(&self, deck_id: DeckId, name: &str, position: i32) -> StoreResult<Column> {
        self.record(Write::InsertColumn { position });
        self.check(FailOn::InsertColumn)?;
        self.inner.insert_column(deck_id, name, position).await
    }

    async fn update_column_position(&self, column_id: ColumnId, position: i32) -> StoreResult<()> {
        self.record(Write::ColumnPosition { column_id, position });
        self.pass(Hold::Positions).await;
        if position < 0 {
            self.check(FailOn::Quarantine)?;
        } else {
            self.check(FailOn::CommitOf(column_id))?;
        }
        self.inner.update_column_position(column_id, position).await
    }

    async fn delete_cards_by_column(&self, column_id: ColumnId) -> StoreResult<()> {
        self.record(Write::DeleteCards { column_id });
        self.check(FailOn::DeleteCards)?;
        self.inner.delete_cards_by_column(column_id).await
    }

    async fn delete_column(&self, column_id: ColumnId) -> StoreResult<()> {
        self.record(Write::DeleteColumn { column_id });
        self.check(FailOn::DeleteColumn)?;
        self.inner.delete_column(column_id).await
    }

    async fn list_cards_by_columns(&self, column_ids: &[ColumnId]) -> StoreResult<Vec<Card>> {
        self.check(FailOn::ListCards)?;
        self.inner.list_cards_by_columns(column_ids).await
    }

    async fn insert_card(&self, deck_id: DeckId, column_id: ColumnId, title: &str) -> StoreResult<Card> {
        self.record(Write::InsertCard { column_id });
        self.check(FailOn::InsertCard)?;
        self.inner.insert_card(deck_id, column_id, title).await
    }

    async fn update_card_column(&self, card_id: CardId, column_id: ColumnId) -> StoreResult<()> {
        self.record(Write::CardColumn { card_id, column_id });
        self.pass(Hold::CardColumn).await;
        self.check(FailOn::CardColumn)?;
        self.inner.update_card_column(card_id, column_id).await
    }
}
