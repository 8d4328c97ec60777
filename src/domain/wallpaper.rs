//! Wallpaper Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::WallpaperId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallpaper {
    pub id: WallpaperId,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Wallpaper {
    pub fn new(id: WallpaperId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Wallpaper {
    type Id = WallpaperId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
