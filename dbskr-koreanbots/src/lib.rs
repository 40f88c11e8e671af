//! Koreanbots integration for the DBSkr bot-list SDK
//!
//! This crate provides a client for the Koreanbots REST API: posting server
//! counts (manually or through autopost), checking votes, looking up bots
//! and users, and building widget image URLs.

pub mod client;
pub mod http;
pub mod types;
pub mod widget;

pub use client::KoreanbotsClient;
pub use http::HttpClient;
pub use types::{Bot, Partial, Stats, User, Vote};
pub use widget::{Widget, WidgetStyle, WidgetType};
