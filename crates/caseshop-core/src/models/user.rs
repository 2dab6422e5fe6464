//! Domain model for the authenticated storefront user.

use serde::{Deserialize, Serialize};

use super::CatalogItem;

/// The signed-in user's profile and wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Wallet balance in whole currency units. Never negative.
    pub balance: u64,
    pub level: Level,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub inventory: Option<Vec<CatalogItem>>,
}

impl User {
    pub fn inventory_len(&self) -> usize {
        self.inventory.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Level is either a bare number (older API responses) or a progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Plain(u32),
    Progress(LevelProgress),
}

impl Level {
    pub fn number(&self) -> u32 {
        match self {
            Level::Plain(level) => *level,
            Level::Progress(progress) => progress.current_level,
        }
    }

    /// Progress toward the next level, 0-100. Plain levels carry no progress.
    pub fn progress_percent(&self) -> u8 {
        match self {
            Level::Plain(_) => 0,
            Level::Progress(progress) => progress.progress_percent.min(100),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Plain(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub current_level: u32,
    pub current_experience: u64,
    pub experience_to_next: u64,
    #[serde(rename = "progress")]
    pub progress_percent: u8,
}

/// Permission tier. Unknown tiers from the server fall back to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Moderator,
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}
