//! Core types for the DBSkr bot-list clients
//!
//! This crate holds what the Koreanbots and UniqueBots clients share:
//! the error taxonomy, the HTTP transport seam, CDN assets, the host
//! application signals and the autopost loop.

pub mod assets;
pub mod autopost;
pub mod config;
pub mod error;
pub mod host;
pub mod platform;
pub mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use assets::{Asset, AssetFormat, DISCORD_CDN_BASE};
pub use autopost::{run_autopost, spawn_autopost, AutopostHandle, StatsPoster};
pub use config::{AutopostConfig, ClientOptions, MIN_AUTOPOST_INTERVAL_SECS};
pub use error::{BotListError, BotListResult};
pub use host::{BotHost, HostController};
pub use platform::Platform;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, ReqwestTransport, Transport};

pub use twilight_model::id::{
    marker::UserMarker,
    Id,
};

/// Discord user (or bot) id
pub type UserId = Id<UserMarker>;
