//! Commands Layer
//!
//! Deck, wallpaper gallery and profile operations over `AppState`.
//! Operations that need an identity take the caller's `Session`.

pub mod decks;
pub mod profile;
pub mod wallpapers;

#[cfg(test)]
mod test_support;

pub use decks::*;
pub use profile::*;
pub use wallpapers::*;
