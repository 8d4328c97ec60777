//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod board_store;
mod deck_repo;
mod user_repo;
mod wallpaper_repo;
mod media;


pub use traits::{BoardStore, Repository};
pub use db::{init_db, DbState, SharedConnection};
pub use board_store::SqliteBoardStore;
pub use deck_repo::DeckRepository;
pub use user_repo::UserRepository;
pub use wallpaper_repo::WallpaperRepository;
pub use media::{upload_file, LocalMediaStorage, MediaFile, MediaStorage};
