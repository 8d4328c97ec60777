//! Deck Repository
//!
//! SQLite-backed implementation for decks and their member lists.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{
    now_millis, timestamp_from_millis, Deck, DeckId, DeckSummary, StoreError, StoreResult, User,
    UserId,
};
use super::db::{connection, SharedConnection};
use super::traits::Repository;
use super::user_repo::row_to_user;

const DECK_COLUMNS: &str =
    "d.id, d.owner, d.wallpaper, d.title, d.description, d.banner_url, d.avatar_url, d.created_at";

/// SQLite implementation of Deck repository
pub struct DeckRepository {
    conn: SharedConnection,
}

impl DeckRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// All decks, newest first, with the owner's display name
    pub async fn list_summaries(&self) -> StoreResult<Vec<DeckSummary>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {}, u.name FROM decks d LEFT JOIN users u ON u.id = d.owner
             ORDER BY d.created_at DESC, d.id DESC",
            DECK_COLUMNS
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(DeckSummary {
                deck: row_to_deck(row)?,
                owner_name: row.get(8)?,
            })
        })?;
        let summaries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// URL of the deck's wallpaper, None when the deck or wallpaper is gone
    pub async fn wallpaper_url(&self, deck_id: DeckId) -> StoreResult<Option<String>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let url = conn
            .query_row(
                "SELECT w.url FROM decks d JOIN wallpapers w ON w.id = d.wallpaper WHERE d.id = ?",
                params![deck_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }

    /// Add a member; adding an existing member is a no-op
    pub async fn add_member(&self, deck_id: DeckId, user_id: UserId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "INSERT OR IGNORE INTO deck_members (deck_id, user_id) VALUES (?, ?)",
            params![deck_id, user_id],
        )?;
        Ok(())
    }

    pub async fn list_members(&self, deck_id: DeckId) -> StoreResult<Vec<User>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(
            "SELECT u.id, u.auth_id, u.name, u.role, u.photo_url, u.created_at
             FROM deck_members m JOIN users u ON u.id = m.user_id
             WHERE m.deck_id = ? ORDER BY u.name, u.id",
        )?;
        let rows = stmt.query_map(params![deck_id], row_to_user)?;
        let members = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    /// Users who are not yet members of the deck
    pub async fn list_non_members(&self, deck_id: DeckId) -> StoreResult<Vec<User>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(
            "SELECT u.id, u.auth_id, u.name, u.role, u.photo_url, u.created_at FROM users u
             WHERE NOT EXISTS (
                SELECT 1 FROM deck_members m WHERE m.deck_id = ? AND m.user_id = u.id
             )
             ORDER BY u.name, u.id",
        )?;
        let rows = stmt.query_map(params![deck_id], row_to_user)?;
        let users = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

#[async_trait]
impl Repository<Deck> for DeckRepository {
    async fn create(&self, entity: &Deck) -> StoreResult<Deck> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created_at = now_millis();
        conn.execute(
            "INSERT INTO decks (owner, wallpaper, title, description, banner_url, avatar_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.owner,
                entity.wallpaper,
                entity.title,
                entity.description,
                entity.banner_url,
                entity.avatar_url,
                created_at
            ],
        )?;

        let mut deck = entity.clone();
        deck.id = conn.last_insert_rowid() as DeckId;
        deck.created_at = timestamp_from_millis(created_at);
        Ok(deck)
    }

    async fn find_by_id(&self, id: DeckId) -> StoreResult<Option<Deck>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let deck = conn
            .query_row(
                &format!("SELECT {} FROM decks d WHERE d.id = ?", DECK_COLUMNS),
                params![id],
                row_to_deck,
            )
            .optional()?;
        Ok(deck)
    }

    async fn list(&self) -> StoreResult<Vec<Deck>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM decks d ORDER BY d.created_at DESC, d.id DESC",
            DECK_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_deck)?;
        let decks = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(decks)
    }

    async fn update(&self, entity: &Deck) -> StoreResult<Deck> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn.execute(
            "UPDATE decks SET wallpaper = ?, title = ?, description = ?, banner_url = ?, avatar_url = ?
             WHERE id = ?",
            params![
                entity.wallpaper,
                entity.title,
                entity.description,
                entity.banner_url,
                entity.avatar_url,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("Deck {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: DeckId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM decks WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        owner: row.get(1)?,
        wallpaper: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        banner_url: row.get(5)?,
        avatar_url: row.get(6)?,
        created_at: timestamp_from_millis(row.get(7)?),
    })
}
