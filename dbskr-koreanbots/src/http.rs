//! Koreanbots REST API
//!
//! One method per endpoint, each performing a single request through the
//! shared [`Transport`].

use crate::types::{Bot, Stats, User, Vote};
use dbskr_core::{
    ApiRequest, BotListError, BotListResult, Platform, Transport, UserId,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Koreanbots REST client
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client; `base_url` defaults to the public v2 API
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: Option<String>,
        token: Option<String>,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| Platform::Koreanbots.api_base().to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            transport,
            base_url,
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Check if the client is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Helper to ensure authentication
    fn require_auth(&self) -> BotListResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| BotListError::auth("Koreanbots token required"))
    }

    fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match &self.token {
            Some(token) => request.with_authorization(token.clone()),
            None => request,
        }
    }

    /// Send a request and unwrap the `data` field of the response
    async fn request(&self, request: ApiRequest) -> BotListResult<Value> {
        let body = self.transport.send(request).await?.into_json()?;
        match body {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| BotListError::parse("Koreanbots response has no data field")),
            other => Err(BotListError::parse(format!(
                "Unexpected Koreanbots response: {}",
                other
            ))),
        }
    }

    /// Update the server (and shard) count of a bot
    #[instrument(skip(self))]
    pub async fn stats(
        &self,
        bot_id: UserId,
        servers: u64,
        shards: Option<u64>,
    ) -> BotListResult<Stats> {
        let token = self.require_auth()?;
        let url = format!("{}/bots/{}/stats", self.base_url, bot_id);
        let stats = Stats { servers, shards };

        debug!("Posting Koreanbots stats to: {}", url);

        let body = serde_json::to_value(stats)
            .map_err(|e| BotListError::parse(format!("Failed to encode stats: {}", e)))?;
        let request = ApiRequest::post(url, body).with_authorization(token);

        // The stats endpoint only acknowledges; echo what was sent unless it answers with data
        let response = self.transport.send(request).await?.into_json()?;
        Ok(response
            .get("data")
            .cloned()
            .and_then(|data| Stats::try_from(data).ok())
            .unwrap_or(stats))
    }

    /// Check whether a user voted for a bot
    #[instrument(skip(self))]
    pub async fn vote(&self, bot_id: UserId, user_id: UserId) -> BotListResult<Vote> {
        let token = self.require_auth()?;
        let url = format!("{}/bots/{}/vote", self.base_url, bot_id);

        debug!("Fetching Koreanbots vote of {} for {}", user_id, bot_id);

        let request = ApiRequest::get(url)
            .with_query("userID", user_id)
            .with_authorization(token);
        Vote::try_from(self.request(request).await?)
    }

    /// Get a bot by id
    #[instrument(skip(self))]
    pub async fn bot(&self, bot_id: UserId) -> BotListResult<Bot> {
        let url = format!("{}/bots/{}", self.base_url, bot_id);

        debug!("Fetching Koreanbots bot: {}", bot_id);

        let request = self.authorize(ApiRequest::get(url));
        Bot::try_from(self.request(request).await?)
    }

    /// Get a user by id
    #[instrument(skip(self))]
    pub async fn user(&self, user_id: UserId) -> BotListResult<User> {
        let url = format!("{}/users/{}", self.base_url, user_id);

        debug!("Fetching Koreanbots user: {}", user_id);

        let request = self.authorize(ApiRequest::get(url));
        User::try_from(self.request(request).await?)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
