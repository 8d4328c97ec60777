//! Wallpaper Repository
//!
//! SQLite-backed wallpaper gallery. Listing is newest first.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{now_millis, timestamp_from_millis, StoreResult, Wallpaper, WallpaperId};
use super::db::{connection, SharedConnection};
use super::traits::Repository;

pub struct WallpaperRepository {
    conn: SharedConnection,
}

impl WallpaperRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Delete every wallpaper row pointing at `url`, returning how many went
    pub async fn delete_by_url(&self, url: &str) -> StoreResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let removed = conn.execute("DELETE FROM wallpapers WHERE url = ?", params![url])?;
        Ok(removed)
    }
}

#[async_trait]
impl Repository<Wallpaper> for WallpaperRepository {
    async fn create(&self, entity: &Wallpaper) -> StoreResult<Wallpaper> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created_at = now_millis();
        conn.execute(
            "INSERT INTO wallpapers (url, created_at) VALUES (?, ?)",
            params![entity.url, created_at],
        )?;

        Ok(Wallpaper {
            id: conn.last_insert_rowid() as WallpaperId,
            url: entity.url.clone(),
            created_at: timestamp_from_millis(created_at),
        })
    }

    async fn find_by_id(&self, id: WallpaperId) -> StoreResult<Option<Wallpaper>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let wallpaper = conn
            .query_row(
                "SELECT id, url, created_at FROM wallpapers WHERE id = ?",
                params![id],
                row_to_wallpaper,
            )
            .optional()?;
        Ok(wallpaper)
    }

    async fn list(&self) -> StoreResult<Vec<Wallpaper>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(
            "SELECT id, url, created_at FROM wallpapers ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_wallpaper)?;
        let wallpapers = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(wallpapers)
    }

    async fn update(&self, entity: &Wallpaper) -> StoreResult<Wallpaper> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "UPDATE wallpapers SET url = ? WHERE id = ?",
            params![entity.url, entity.id],
        )?;
        Ok(entity.clone())
    }

    async fn delete(&self, id: WallpaperId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM wallpapers WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn row_to_wallpaper(row: &rusqlite::Row) -> rusqlite::Result<Wallpaper> {
    Ok(Wallpaper {
        id: row.get(0)?,
        url: row.get(1)?,
        created_at: timestamp_from_millis(row.get(2)?),
    })
}
