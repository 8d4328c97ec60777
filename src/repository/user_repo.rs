//! User Repository
//!
//! SQLite-backed implementation for user profiles.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{now_millis, timestamp_from_millis, Role, StoreError, StoreResult, User, UserId};
use super::db::{connection, SharedConnection};
use super::traits::Repository;

const USER_COLUMNS: &str = "id, auth_id, name, role, photo_url, created_at";

/// SQLite implementation of User repository
pub struct UserRepository {
    conn: SharedConnection,
}

impl UserRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Resolve the profile row for an auth-provider identity
    pub async fn find_by_auth_id(&self, auth_id: &str) -> StoreResult<Option<User>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE auth_id = ?", USER_COLUMNS),
                params![auth_id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn create(&self, entity: &User) -> StoreResult<User> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created_at = now_millis();
        conn.execute(
            "INSERT INTO users (auth_id, name, role, photo_url, created_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.auth_id, entity.name, entity.role.as_str(), entity.photo_url, created_at],
        )?;

        let mut user = entity.clone();
        user.id = conn.last_insert_rowid() as UserId;
        user.created_at = timestamp_from_millis(created_at);
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY name, id", USER_COLUMNS))?;
        let rows = stmt.query_map([], row_to_user)?;
        let users = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn update(&self, entity: &User) -> StoreResult<User> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn.execute(
            "UPDATE users SET name = ?, role = ?, photo_url = ? WHERE id = ?",
            params![entity.name, entity.role.as_str(), entity.photo_url, entity.id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("User {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: UserId) -> StoreResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        Ok(())
    }
}

pub(super) fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        auth_id: row.get(1)?,
        name: row.get(2)?,
        role: Role::from_str(&row.get::<_, String>(3)?),
        photo_url: row.get(4)?,
        created_at: timestamp_from_millis(row.get(5)?),
    })
}
