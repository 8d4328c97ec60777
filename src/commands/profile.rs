//! Profile Commands

use crate::domain::User;
use crate::error::{require_text, BoardResult};
use crate::repository::{upload_file, MediaFile, Repository};
use crate::session::Session;
use crate::AppState;

/// Update the signed-in user's name and, when `photo` is given, replace
/// their profile photo. Upload failures abort before the row is touched.
pub async fn update_profile(
    state: &AppState,
    session: &mut Session,
    name: &str,
    photo: Option<&MediaFile>,
) -> BoardResult<User> {
    let current = session.require_user()?.clone();
    let name = require_text(name, "Name")?;

    let photo_url = match photo {
        Some(file) => {
            let key = format!("{}/foto_perfil.{}", current.auth_id, file.extension());
            upload_file(state.media.as_ref(), &state.config.buckets.profile_photo, &key, file, true).await?
        }
        None => current.photo_url.clone(),
    };

    let updated = state
        .users
        .update(&User { name, photo_url, ..current })
        .await?;
    log::info!("Updated profile of user {}", updated.id);

    session.refresh(updated.clone());
    Ok(updated)
}
