//! User Entity
//!
//! Application profile linked to an identity at the external auth provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Limited,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Limited => "limited",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::Limited,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Identity at the auth provider
    pub auth_id: String,
    pub name: String,
    pub role: Role,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, auth_id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            auth_id: auth_id.into(),
            name: name.into(),
            role,
            photo_url: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
