//! Client configuration

use crate::error::{BotListError, BotListResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Shortest autopost interval the bot-lists accept (3 minutes)
pub const MIN_AUTOPOST_INTERVAL_SECS: u64 = 180;

/// Options shared by every bot-list client
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// API token issued by the bot-list
    #[serde(default)]
    pub token: Option<String>,
    /// Override of the service endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub autopost: AutopostConfig,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_autopost(mut self, autopost: AutopostConfig) -> Self {
        self.autopost = autopost;
        self
    }

    pub fn without_autopost(self) -> Self {
        self.with_autopost(AutopostConfig::disabled())
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("autopost", &self.autopost)
            .finish()
    }
}

/// Periodic guild count submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutopostConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between two submissions
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for AutopostConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
        }
    }
}

impl AutopostConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Enabled, posting every `interval_secs` seconds
    pub fn every(interval_secs: u64) -> Self {
        Self {
            enabled: true,
            interval_secs,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Reject intervals under three minutes when autopost is on
    pub fn validate(&self) -> BotListResult<()> {
        if self.enabled && self.interval_secs < MIN_AUTOPOST_INTERVAL_SECS {
            return Err(BotListError::config(format!(
                "autopost interval must be greater than or equal to 3 minutes ({}s), got {}s",
                MIN_AUTOPOST_INTERVAL_SECS, self.interval_secs
            )));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    3600 // 1 hour
}
