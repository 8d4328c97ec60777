//! Deck Entity
//!
//! A kanban board. Owns columns and, through them, cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::{DeckId, UserId, WallpaperId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub owner: UserId,
    pub wallpaper: WallpaperId,
    pub title: String,
    pub description: String,
    /// Public URL of the banner image, empty when none was uploaded
    pub banner_url: String,
    /// Public URL of the deck avatar, empty when none was uploaded
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(id: DeckId, owner: UserId, wallpaper: WallpaperId, title: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            wallpaper,
            title: title.into(),
            description: String::new(),
            banner_url: String::new(),
            avatar_url: String::new(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Deck {
    type Id = DeckId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Deck listing row with the owner's display name joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub deck: Deck,
    pub owner_name: Option<String>,
}
