//! Column Entity
//!
//! A named lane within a deck. `position` orders columns left to right.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::{ColumnId, DeckId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    /// Owning deck
    pub deck_id: DeckId,
    pub name: String,
    /// Zero-based rank within the deck
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Column {
    pub fn new(id: ColumnId, deck_id: DeckId, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            deck_id,
            name: name.into(),
            position,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Column {
    type Id = ColumnId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
