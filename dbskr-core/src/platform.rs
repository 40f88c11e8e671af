//! Platform definitions for bot-list services

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported bot-list services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Koreanbots - REST API
    Koreanbots,
    /// UniqueBots - GraphQL API
    UniqueBots,
}

impl Platform {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Koreanbots => "Koreanbots",
            Platform::UniqueBots => "UniqueBots",
        }
    }

    /// Default API endpoint of the service
    pub fn api_base(&self) -> &'static str {
        match self {
            Platform::Koreanbots => "https://koreanbots.dev/api/v2",
            Platform::UniqueBots => "https://uniquebots.kr/graphql",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "koreanbots" | "kb" => Ok(Platform::Koreanbots),
            "uniquebots" | "ub" => Ok(Platform::UniqueBots),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("Koreanbots".parse::<Platform>(), Ok(Platform::Koreanbots));
        assert_eq!("ub".parse::<Platform>(), Ok(Platform::UniqueBots));
        assert!("topgg".parse::<Platform>().is_err());
    }
}
