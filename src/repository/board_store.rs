//! Board Store - SQLite implementation
//!
//! Column and card persistence behind the `BoardStore` trait.
//! `deck_columns` is unique on (deck_id, position), so position rewrites
//! must never let two columns of a deck share a value.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter};

use crate::domain::{
    now_millis, timestamp_from_millis, Card, CardId, Column, ColumnId, DeckId, StoreError,
    StoreResult,
};
use super::db::{connection, SharedConnection};
use super::traits::BoardStore;

/// SQLite implementation of the board store
pub struct SqliteBoardStore {
    conn: SharedConnection,
}

impl SqliteBoardStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BoardStore for SqliteBoardStore {
    async fn list_columns(&self, deck_id: DeckId) -> StoreResult<Vec<Column>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(
            "SELECT id, deck_id, name, position, created_at FROM deck_columns
             WHERE deck_id = ? ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![deck_id], row_to_column)?;
        let columns = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    async fn insert_column(&self, deck_id: DeckId, name: &str, position: i32) -> StoreResult<Column> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created_at = now_millis();
        conn.execute(
            "INSERT INTO deck_columns (deck_id, name, position, created_at) VALUES (?, ?, ?, ?)",
            params![deck_id, name, position, created_at],
        )?;

        Ok(Column {
            id: conn.last_insert_rowid() as ColumnId,
            deck_id,
            name: name.to_string(),
            position,
            created_at: timestamp_from_millis(created_at),
        })
    }

    async fn update_column_position(&self, column_id: ColumnId, position: i32) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn.execute(
            "UPDATE deck_columns SET position = ? WHERE id = ?",
            params![position, column_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("Column {} not found", column_id)));
        }
        Ok(())
    }

    async fn delete_cards_by_column(&self, column_id: ColumnId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM deck_cards WHERE column_id = ?", params![column_id])?;
        Ok(())
    }

    async fn delete_column(&self, column_id: ColumnId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        // Fails with a constraint violation while cards still reference it
        let changed = conn.execute("DELETE FROM deck_columns WHERE id = ?", params![column_id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("Column {} not found", column_id)));
        }
        Ok(())
    }

    async fn list_cards_by_columns(&self, column_ids: &[ColumnId]) -> StoreResult<Vec<Card>> {
        if column_ids.is_empty() {
            return Ok(Vec::new());
        }

        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let placeholders = vec!["?"; column_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, deck_id, column_id, title, description, created_at FROM deck_cards
             WHERE column_id IN ({}) ORDER BY id",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(column_ids.iter()), row_to_card)?;
        let cards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    async fn insert_card(&self, deck_id: DeckId, column_id: ColumnId, title: &str) -> StoreResult<Card> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created_at = now_millis();
        let changed = conn.execute(
            "INSERT INTO deck_cards (deck_id, column_id, title, created_at)
             SELECT ?1, id, ?3, ?4 FROM deck_columns WHERE id = ?2 AND deck_id = ?1",
            params![deck_id, column_id, title, created_at],
        )?;
        if changed == 0 {
            return Err(StoreError::InvalidInput(format!(
                "Column {} does not belong to deck {}",
                column_id, deck_id
            )));
        }

        Ok(Card {
            id: conn.last_insert_rowid() as CardId,
            deck_id,
            column_id,
            title: title.to_string(),
            description: None,
            created_at: timestamp_from_millis(created_at),
        })
    }

    async fn update_card_column(&self, card_id: CardId, column_id: ColumnId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        // The target column must belong to the card's own deck
        let changed = conn.execute(
            "UPDATE deck_cards SET column_id = ?2
             WHERE id = ?1 AND EXISTS (
                SELECT 1 FROM deck_columns c WHERE c.id = ?2 AND c.deck_id = deck_cards.deck_id
             )",
            params![card_id, column_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!(
                "Card {} or column {} not found in the same deck",
                card_id, column_id
            )));
        }
        Ok(())
    }
}

fn row_to_column(row: &rusqlite::Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        created_at: timestamp_from_millis(row.get(4)?),
    })
}

fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        column_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        created_at: timestamp_from_millis(row.get(5)?),
    })
}
