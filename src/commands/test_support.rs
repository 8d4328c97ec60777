//! Shared fixtures for command tests

use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::AppConfig;
use crate::domain::{Role, User};
use crate::repository::Repository;
use crate::session::Session;
use crate::AppState;

/// App state on an in-memory database with media under a temp dir.
/// Keep the `TempDir` alive for the duration of the test.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = AppConfig {
        database_path: PathBuf::from(":memory:"),
        media_root: dir.path().to_path_buf(),
        public_base_url: "http://media.test".to_string(),
        ..AppConfig::default()
    };
    let state = AppState::open(config).await.expect("Failed to open app state");
    (state, dir)
}

pub async fn signed_in(state: &AppState, auth_id: &str, name: &str, role: Role) -> Session {
    let user = state
        .users
        .create(&User::new(0, auth_id, name, role))
        .await
        .expect("Failed to create user");
    Session::signed_in(user)
}
