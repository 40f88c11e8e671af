//! Error types shared by every bot-list client

use thiserror::Error;

/// Bot-list wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BotListError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests (429): {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl BotListError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        BotListError::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BotListError::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        BotListError::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BotListError::NotFound(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        BotListError::RateLimited(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        BotListError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn graphql(msg: impl Into<String>) -> Self {
        BotListError::Graphql(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        BotListError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        BotListError::Parse(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        BotListError::Io(msg.into())
    }

    /// Pick the error kind for a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => BotListError::Unauthorized(message),
            404 => BotListError::NotFound(message),
            429 => BotListError::RateLimited(message),
            _ => BotListError::Api { status, message },
        }
    }

    /// Whether the remote service rejected the call for sending too many requests
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BotListError::RateLimited(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BotListError::Unauthorized(_))
    }
}

/// Result type alias for bot-list operations
pub type BotListResult<T> = Result<T, BotListError>;
