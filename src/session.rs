//! Session Context
//!
//! The signed-in user, resolved from the auth provider's identity. Commands
//! that need an identity take the session explicitly.

use crate::domain::{StoreResult, User};
use crate::error::{BoardError, BoardResult};
use crate::repository::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for an already resolved user
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Resolve the profile row for `auth_id`. An identity without a profile
    /// leaves the session signed out.
    pub async fn sign_in(&mut self, auth_id: &str, users: &UserRepository) -> StoreResult<Option<User>> {
        self.user = users.find_by_auth_id(auth_id).await?;
        match &self.user {
            Some(user) => log::info!("Signed in user {} ({})", user.id, user.role.as_str()),
            None => log::warn!("No profile for identity {}", auth_id),
        }
        Ok(self.user.clone())
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> BoardResult<&User> {
        self.user.as_ref().ok_or(BoardError::NotSignedIn)
    }

    pub fn require_admin(&self) -> BoardResult<&User> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(BoardError::NotAuthorized(format!(
                "user {} is not an administrator",
                user.id
            )));
        }
        Ok(user)
    }

    /// Replace the cached profile after it was updated in the store
    pub(crate) fn refresh(&mut self, user: User) {
        self.user = Some(user);
    }
}
