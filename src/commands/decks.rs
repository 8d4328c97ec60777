//! Deck Commands
//!
//! Deck list, deck creation with optional banner and avatar images, and
//! membership management.

use rand::seq::SliceRandom;

use crate::domain::{now_millis, Deck, DeckId, DeckSummary, User, UserId, WallpaperId};
use crate::error::{require_text, BoardResult};
use crate::repository::{upload_file, MediaFile, Repository};
use crate::session::Session;
use crate::AppState;

/// Used when no wallpaper was picked and the gallery is empty
pub const FALLBACK_WALLPAPER: WallpaperId = 1;

/// Input for `create_deck`
#[derive(Debug, Clone, Default)]
pub struct NewDeck {
    pub title: String,
    pub description: String,
    pub wallpaper: Option<WallpaperId>,
    pub banner: Option<MediaFile>,
    pub avatar: Option<MediaFile>,
}

/// All decks, newest first
pub async fn list_decks(state: &AppState) -> BoardResult<Vec<DeckSummary>> {
    Ok(state.decks.list_summaries().await?)
}

/// Create a deck owned by the signed-in user
pub async fn create_deck(state: &AppState, session: &Session, input: NewDeck) -> BoardResult<Deck> {
    let owner = session.require_user()?;
    let title = require_text(&input.title, "Deck title")?;

    let wallpaper = match input.wallpaper {
        Some(id) => id,
        None => random_wallpaper(state).await?,
    };

    let millis = now_millis();
    let buckets = &state.config.buckets;
    let banner_url = match &input.banner {
        Some(file) => {
            let key = format!("{}/{}_banner.{}", owner.auth_id, millis, file.extension());
            upload_or_empty(state, &buckets.deck_banner, &key, file).await
        }
        None => String::new(),
    };
    let avatar_url = match &input.avatar {
        Some(file) => {
            let key = format!("{}/{}_pfp.{}", owner.auth_id, millis, file.extension());
            upload_or_empty(state, &buckets.deck_avatar, &key, file).await
        }
        None => String::new(),
    };

    let deck = Deck {
        description: input.description.trim().to_string(),
        banner_url,
        avatar_url,
        ..Deck::new(0, owner.id, wallpaper, title)
    };
    let created = state.decks.create(&deck).await?;
    log::info!("User {} created deck {}", owner.id, created.id);
    Ok(created)
}

async fn random_wallpaper(state: &AppState) -> BoardResult<WallpaperId> {
    let wallpapers = state.wallpapers.list().await?;
    let chosen = wallpapers
        .choose(&mut rand::thread_rng())
        .map(|w| w.id)
        .unwrap_or(FALLBACK_WALLPAPER);
    Ok(chosen)
}

/// A failed image upload does not block deck creation
async fn upload_or_empty(state: &AppState, bucket: &str, key: &str, file: &MediaFile) -> String {
    match upload_file(state.media.as_ref(), bucket, key, file, false).await {
        Ok(url) => url,
        Err(e) => {
            log::error!("Failed to upload {}/{}: {}", bucket, key, e);
            String::new()
        }
    }
}

pub async fn deck_wallpaper_url(state: &AppState, deck_id: DeckId) -> BoardResult<Option<String>> {
    Ok(state.decks.wallpaper_url(deck_id).await?)
}

pub async fn list_members(state: &AppState, deck_id: DeckId) -> BoardResult<Vec<User>> {
    Ok(state.decks.list_members(deck_id).await?)
}

/// Adding an existing member is a no-op
pub async fn add_member(state: &AppState, deck_id: DeckId, user_id: UserId) -> BoardResult<()> {
    state.decks.add_member(deck_id, user_id).await?;
    log::info!("Added user {} to deck {}", user_id, deck_id);
    Ok(())
}

/// Users that can still be added to the deck
pub async fn list_candidates(state: &AppState, deck_id: DeckId) -> BoardResult<Vec<User>> {
    Ok(state.decks.list_non_members(deck_id).await?)
}
