//! UniqueBots client

use crate::http::HttpClient;
use crate::types::{Bot, Stats};
use async_trait::async_trait;
use dbskr_core::{
    spawn_autopost, AutopostHandle, BotHost, BotListResult, ClientOptions, Platform,
    ReqwestTransport, StatsPoster, Transport, UserId,
};
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, warn};

struct GuildCountPoster {
    http: HttpClient,
    bot_id: UserId,
}

#[async_trait]
impl StatsPoster for GuildCountPoster {
    fn platform(&self) -> Platform {
        Platform::UniqueBots
    }

    // UniqueBots has no notion of shards
    async fn post_guild_count(&self, guild_count: usize, _shard_count: Option<u64>) -> BotListResult<()> {
        self.http
            .stats(self.bot_id, guild_count as u64)
            .await
            .map(|_| ())
    }
}

/// UniqueBots client
pub struct UniquebotsClient {
    http: HttpClient,
    host: BotHost,
    autopost: Option<AutopostHandle>,
}

impl UniquebotsClient {
    /// Create a client with its own HTTP session.
    ///
    /// `options.base_url` overrides the GraphQL endpoint.
    pub fn new(host: BotHost, options: ClientOptions) -> BotListResult<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(host, options, transport)
    }

    pub fn with_transport(
        host: BotHost,
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> BotListResult<Self> {
        options.autopost.validate()?;

        let http = HttpClient::new(transport, options.base_url, options.token);

        let autopost = if options.autopost.enabled {
            if !http.is_authenticated() {
                warn!("UniqueBots autopost enabled without a token, the first post will fail");
            }
            let poster = Arc::new(GuildCountPoster {
                http: http.clone(),
                bot_id: host.bot_id(),
            });
            Some(spawn_autopost(poster, host.clone(), options.autopost)?)
        } else {
            None
        };

        Ok(Self {
            http,
            host,
            autopost,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn host(&self) -> &BotHost {
        &self.host
    }

    pub fn autopost(&self) -> Option<&AutopostHandle> {
        self.autopost.as_ref()
    }

    pub fn take_autopost(&mut self) -> Option<AutopostHandle> {
        self.autopost.take()
    }

    /// Stop autopost immediately
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.autopost.take() {
            handle.abort();
        }
    }

    pub fn guild_count(&self) -> usize {
        self.host.guild_count()
    }

    /// Post the guild count, defaulting to the host's live count
    #[instrument(skip(self))]
    pub async fn stats(&self, guild_count: Option<usize>) -> BotListResult<Stats> {
        let guild_count = guild_count.unwrap_or_else(|| self.guild_count());
        self.http.stats(self.host.bot_id(), guild_count as u64).await
    }

    /// Get a bot, defaulting to this bot
    #[instrument(skip(self))]
    pub async fn bot(&self, bot_id: Option<UserId>) -> BotListResult<Bot> {
        self.http.bot(bot_id.unwrap_or_else(|| self.host.bot_id())).await
    }
}

impl fmt::Debug for UniquebotsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniquebotsClient")
            .field("http", &self.http)
            .field("host", &self.host)
            .field("autopost", &self.autopost.is_some())
            .finish()
    }
}
