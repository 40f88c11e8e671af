//! Koreanbots client
//!
//! Entry point held by the bot application. Wraps the REST client, fills in
//! the host's own bot id and guild count where the caller leaves them out,
//! and owns the autopost task.

use crate::http::HttpClient;
use crate::types::{Bot, Stats, User, Vote};
use crate::widget::{Widget, WidgetStyle, WidgetType};
use async_trait::async_trait;
use dbskr_core::{
    spawn_autopost, AutopostHandle, BotHost, BotListResult, ClientOptions, Platform,
    ReqwestTransport, StatsPoster, Transport, UserId,
};
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Posts the host's guild count for autopost
struct GuildCountPoster {
    http: HttpClient,
    bot_id: UserId,
}

#[async_trait]
impl StatsPoster for GuildCountPoster {
    fn platform(&self) -> Platform {
        Platform::Koreanbots
    }

    async fn post_guild_count(
        &self,
        guild_count: usize,
        shard_count: Option<u64>,
    ) -> BotListResult<()> {
        self.http
            .stats(self.bot_id, guild_count as u64, shard_count)
            .await
            .map(|_| ())
    }
}

/// Koreanbots client
pub struct KoreanbotsClient {
    http: HttpClient,
    host: BotHost,
    autopost: Option<AutopostHandle>,
}

impl KoreanbotsClient {
    /// Create a client with its own HTTP session.
    ///
    /// With autopost enabled (the default) this must run inside a Tokio
    /// runtime, and the interval must be at least three minutes.
    pub fn new(host: BotHost, options: ClientOptions) -> BotListResult<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(host, options, transport)
    }

    /// Create a client on top of an existing transport
    pub fn with_transport(
        host: BotHost,
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> BotListResult<Self> {
        options.autopost.validate()?;

        let http = HttpClient::new(transport, options.base_url, options.token);

        let autopost = if options.autopost.enabled {
            if !http.is_authenticated() {
                warn!("Koreanbots autopost enabled without a token, the first post will fail");
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

    /// The running autopost task, if enabled
    pub fn autopost(&self) -> Option<&AutopostHandle> {
        self.autopost.as_ref()
    }

    /// Take ownership of the autopost task, e.g. to await its outcome
    pub fn take_autopost(&mut self) -> Option<AutopostHandle> {
        self.autopost.take()
    }

    /// Stop autopost immediately
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.autopost.take() {
            handle.abort();
        }
    }

    /// Number of guilds the host is currently in
    pub fn guild_count(&self) -> usize {
        self.host.guild_count()
    }

    /// Post the guild count, defaulting to the host's live count
    #[instrument(skip(self))]
    pub async fn stats(&self, guild_count: Option<usize>) -> BotListResult<Stats> {
        let guild_count = guild_count.unwrap_or_else(|| self.guild_count());
        self.http
            .stats(self.host.bot_id(), guild_count as u64, self.host.shard_count())
            .await
    }

    /// Whether `user_id` voted for this bot
    #[instrument(skip(self))]
    pub async fn vote(&self, user_id: UserId) -> BotListResult<Vote> {
        self.http.vote(self.host.bot_id(), user_id).await
    }

    /// Get a bot, defaulting to this bot
    #[instrument(skip(self))]
    pub async fn bot(&self, bot_id: Option<UserId>) -> BotListResult<Bot> {
        let bot_id = bot_id.unwrap_or_else(|| self.host.bot_id());
        self.http.bot(bot_id).await
    }

    #[instrument(skip(self))]
    pub async fn user(&self, user_id: UserId) -> BotListResult<User> {
        self.http.user(user_id).await
    }

    /// Build a widget for a bot, defaulting to this bot
    pub fn widget(
        &self,
        widget_type: WidgetType,
        bot_id: Option<UserId>,
        style: Option<WidgetStyle>,
        scale: Option<f32>,
        icon: Option<bool>,
    ) -> BotListResult<Widget> {
        let mut widget = Widget::new(widget_type, bot_id.unwrap_or_else(|| self.host.bot_id()));
        if let Some(style) = style {
            widget = widget.with_style(style);
        }
        if let Some(scale) = scale {
            widget = widget.with_scale(scale)?;
        }
        if let Some(icon) = icon {
            widget = widget.with_icon(icon);
        }
        Ok(widget)
    }
}

impl fmt::Debug for KoreanbotsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KoreanbotsClient")
            .field("http", &self.http)
            .field("host", &self.host)
            .field("autopost", &self.autopost.is_some())
            .finish()
    }
}
