//! UniqueBots integration for the DBSkr bot-list SDK
//!
//! UniqueBots exposes a single GraphQL endpoint. This crate provides the
//! query client and a facade that keeps the bot's guild count up to date.

pub mod client;
pub mod graphql;
pub mod http;
pub mod types;

pub use client::UniquebotsClient;
pub use graphql::{GraphqlError, GraphqlRequest, GraphqlResponse};
pub use http::HttpClient;
pub use types::{Bot, Category, Library, Stats};
