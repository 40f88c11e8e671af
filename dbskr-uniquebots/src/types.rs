//! UniqueBots response types
//!
//! These mirror the fields selected by the queries in [`crate::http`].

use dbskr_core::{Asset, BotListError, BotListResult, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bot listed on UniqueBots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: UserId,
    pub name: String,
    #[serde(rename = "avatarURL", default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub discord_verified: bool,
    #[serde(default)]
    pub guilds: u64,
    #[serde(default)]
    pub status: Option<String>,
    /// One-line summary
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invite: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Support server invite
    #[serde(default)]
    pub support: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub library: Option<Library>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Bot {
    /// Avatar image, if the bot has one
    pub fn avatar_asset(&self) -> BotListResult<Option<Asset>> {
        self.avatar_url
            .as_deref()
            .map(Asset::from_image_url)
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Guild count stored on UniqueBots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub guilds: u64,
}

impl TryFrom<Value> for Bot {
    type Error = BotListError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
            .map_err(|e| BotListError::parse(format!("Failed to parse bot: {}", e)))
    }
}

impl TryFrom<Value> for Stats {
    type Error = BotListError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
            .map_err(|e| BotListError::parse(format!("Failed to parse stats: {}", e)))
    }
}
