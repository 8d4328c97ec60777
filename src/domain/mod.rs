//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod deck;
mod column;
mod card;
mod user;
mod wallpaper;

pub use entity::{Entity, StoreError, StoreResult, now_millis, timestamp_from_millis};
pub use deck::{Deck, DeckSummary};
pub use column::Column;
pub use card::Card;
pub use user::{Role, User};
pub use wallpaper::Wallpaper;

pub type DeckId = u32;
pub type ColumnId = u32;
pub type CardId = u32;
pub type UserId = u32;
pub type WallpaperId = u32;
