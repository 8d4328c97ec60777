//! Wallpaper Gallery Commands
//!
//! Listing is open to everyone; uploads and deletes need an administrator.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::{now_millis, StoreError, Wallpaper};
use crate::error::{BoardError, BoardResult};
use crate::repository::{upload_file, MediaFile, Repository};
use crate::session::Session;
use crate::AppState;

/// Newest first
pub async fn list_wallpapers(state: &AppState) -> BoardResult<Vec<Wallpaper>> {
    Ok(state.wallpapers.list().await?)
}

fn wallpaper_key(file: &MediaFile) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("wallpaper-{}-{}.{}", now_millis(), suffix, file.extension())
}

pub async fn upload_wallpaper(state: &AppState, session: &Session, file: &MediaFile) -> BoardResult<Wallpaper> {
    let admin = session.require_admin()?;

    let key = wallpaper_key(file);
    let url = upload_file(state.media.as_ref(), &state.config.buckets.wallpaper, &key, file, false).await?;
    let wallpaper = state.wallpapers.create(&Wallpaper::new(0, url)).await?;

    log::info!("Admin {} added wallpaper {}", admin.id, wallpaper.id);
    Ok(wallpaper)
}

/// Upload several files. A file that fails is logged and skipped; the
/// ones that made it are returned.
pub async fn upload_wallpapers(
    state: &AppState,
    session: &Session,
    files: &[MediaFile],
) -> BoardResult<Vec<Wallpaper>> {
    session.require_admin()?;
    if files.is_empty() {
        return Err(BoardError::InvalidInput("Select at least one image".to_string()));
    }

    let mut uploaded = Vec::with_capacity(files.len());
    for file in files {
        match upload_wallpaper(state, session, file).await {
            Ok(wallpaper) => uploaded.push(wallpaper),
            Err(e) => log::error!("Failed to upload wallpaper {}: {}", file.file_name, e),
        }
    }
    Ok(uploaded)
}

/// Remove the gallery entry for `url`. The stored object is left in place.
pub async fn delete_wallpaper(state: &AppState, session: &Session, url: &str) -> BoardResult<()> {
    let admin = session.require_admin()?;

    let removed = state.wallpapers.delete_by_url(url).await?;
    if removed == 0 {
        return Err(StoreError::NotFound(format!("Wallpaper {} not found", url)).into());
    }
    log::info!("Admin {} removed wallpaper {}", admin.id, url);
    Ok(())
}
