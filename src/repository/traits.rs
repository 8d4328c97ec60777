//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, a hosted backend, in-memory fakes, etc.

use async_trait::async_trait;

use crate::domain::{Card, CardId, Column, ColumnId, DeckId, Entity, StoreResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity, returning it with its assigned ID
    async fn create(&self, entity: &T) -> StoreResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> StoreResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> StoreResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> StoreResult<()>;
}

/// Column and card operations the board needs from its backing store.
///
/// No transaction or batching contract: every call is an independent
/// request, and the caller fully controls column positions.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Columns of a deck, sorted by position ascending
    async fn list_columns(&self, deck_id: DeckId) -> StoreResult<Vec<Column>>;

    async fn insert_column(&self, deck_id: DeckId, name: &str, position: i32) -> StoreResult<Column>;

    async fn update_column_position(&self, column_id: ColumnId, position: i32) -> StoreResult<()>;

    /// Delete every card in a column. Not atomic with `delete_column`.
    async fn delete_cards_by_column(&self, column_id: ColumnId) -> StoreResult<()>;

    async fn delete_column(&self, column_id: ColumnId) -> StoreResult<()>;

    /// Cards whose column is in `column_ids`, in insertion order
    async fn list_cards_by_columns(&self, column_ids: &[ColumnId]) -> StoreResult<Vec<Card>>;

    async fn insert_card(&self, deck_id: DeckId, column_id: ColumnId, title: &str) -> StoreResult<Card>;

    async fn update_card_column(&self, card_id: CardId, column_id: ColumnId) -> StoreResult<()>;
}
