//! Deckboard
//!
//! Layered architecture:
//! - domain: Core entities and storage errors
//! - repository: Data access abstractions, SQLite and media implementations
//! - board: Board state cache, drag classification and position reconciler
//! - commands: Deck, wallpaper and profile operations
//! - session / config: Signed-in user and application settings

use std::sync::Arc;

pub mod domain;
pub mod repository;
pub mod board;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

pub use board::{Board, BoardState, DropOutcome, MoveOutcome, ReorderOutcome};
pub use config::AppConfig;
pub use error::{BoardError, BoardResult};
pub use session::Session;

use domain::{DeckId, StoreResult};
use repository::{
    init_db, DbState, DeckRepository, LocalMediaStorage, MediaStorage, SqliteBoardStore,
    UserRepository, WallpaperRepository,
};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub decks: DeckRepository,
    pub users: UserRepository,
    pub wallpapers: WallpaperRepository,
    pub board_store: Arc<SqliteBoardStore>,
    pub media: Arc<dyn MediaStorage>,
    pub config: AppConfig,
}

impl AppState {
    /// Open the database from `config` with media kept under `media_root`
    pub async fn open(config: AppConfig) -> StoreResult<Self> {
        let media = Arc::new(LocalMediaStorage::new(
            config.media_root.clone(),
            config.public_base_url.clone(),
        ));
        Self::with_media(config, media).await
    }

    pub async fn with_media(config: AppConfig, media: Arc<dyn MediaStorage>) -> StoreResult<Self> {
        let db_state = init_db(&config.database_path).await?;
        let conn = db_state.conn.clone();

        Ok(Self {
            decks: DeckRepository::new(conn.clone()),
            users: UserRepository::new(conn.clone()),
            wallpapers: WallpaperRepository::new(conn.clone()),
            board_store: Arc::new(SqliteBoardStore::new(conn)),
            db_state,
            media,
            config,
        })
    }

    /// Board cache for one deck; call `load` before use
    pub fn open_board(&self, deck_id: DeckId) -> Board<SqliteBoardStore> {
        Board::new(Arc::clone(&self.board_store), deck_id)
    }
}

/// Install the rolling file logger described by `config`
pub fn init_logging(config: &AppConfig) -> Result<(), rolling_logger::LoggerError> {
    rolling_logger::init_logger(&config.log_dir, &config.app_name)?;
    log::info!("Logging to {}", config.log_dir.display());
    Ok(())
}
