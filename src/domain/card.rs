//! Card Entity
//!
//! A single task belonging to exactly one column of a deck.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::{CardId, ColumnId, DeckId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    /// Column the card currently sits in
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(id: CardId, deck_id: DeckId, column_id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            deck_id,
            column_id,
            title: title.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Card {
    type Id = CardId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
