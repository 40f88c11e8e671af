//! Signals and state borrowed from the host bot application
//!
//! The clients never reach into the host's Discord framework directly.
//! Instead the host hands over a [`BotHost`]: its own user id, a pull-based
//! guild counter, and a readiness/shutdown signal pair driven through the
//! matching [`HostController`].

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use twilight_model::id::{marker::UserMarker, Id};

type GuildCounter = Arc<dyn Fn() -> usize + Send + Sync>;

/// Read side of the host application, held by the clients
#[derive(Clone)]
pub struct BotHost {
    bot_id: Id<UserMarker>,
    shard_count: Option<u64>,
    guild_count: GuildCounter,
    ready: watch::Receiver<bool>,
    closed: watch::Receiver<bool>,
}

/// Write side of the host signals, kept by the host application
#[derive(Debug)]
pub struct HostController {
    ready: watch::Sender<bool>,
    closed: watch::Sender<bool>,
}

impl BotHost {
    /// Create a host handle and the controller driving its signals
    pub fn new<F>(bot_id: Id<UserMarker>, guild_count: F) -> (HostController, Self)
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        let (ready_tx, ready_rx) = watch::channel(false);
        let (closed_tx, closed_rx) = watch::channel(false);

        let controller = HostController {
            ready: ready_tx,
            closed: closed_tx,
        };
        let host = Self {
            bot_id,
            shard_count: None,
            guild_count: Arc::new(guild_count),
            ready: ready_rx,
            closed: closed_rx,
        };

        (controller, host)
    }

    /// Host backed by a twilight in-memory cache
    #[cfg(feature = "twilight")]
    pub fn from_cache(
        bot_id: Id<UserMarker>,
        cache: Arc<twilight_cache_inmemory::InMemoryCache>,
    ) -> (HostController, Self) {
        Self::new(bot_id, move || cache.stats().guilds())
    }

    pub fn with_shard_count(mut self, shard_count: u64) -> Self {
        self.shard_count = Some(shard_count);
        self
    }

    pub fn bot_id(&self) -> Id<UserMarker> {
        self.bot_id
    }

    pub fn shard_count(&self) -> Option<u64> {
        self.shard_count
    }

    /// Current number of joined guilds, read live from the host
    pub fn guild_count(&self) -> usize {
        (self.guild_count)()
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Whether the host has shut down (or dropped its controller)
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow() || self.closed.has_changed().is_err()
    }

    /// Wait for the host to become ready.
    ///
    /// Returns `false` if the controller was dropped before that happened.
    pub async fn wait_until_ready(&self) -> bool {
        let mut ready = self.ready.clone();
        let became_ready = ready.wait_for(|ready| *ready).await.is_ok();
        became_ready
    }
}

impl fmt::Debug for BotHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotHost")
            .field("bot_id", &self.bot_id)
            .field("shard_count", &self.shard_count)
            .field("ready", &self.is_ready())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl HostController {
    /// Signal that the bot is connected
    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    /// Signal that the bot is shutting down
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_guild_count_is_live() {
        let guilds = Arc::new(AtomicUsize::new(3));
        let counter = Arc::clone(&guilds);
        let (_controller, host) = BotHost::new(Id::new(1), move || counter.load(Ordering::SeqCst));

        assert_eq!(host.guild_count(), 3);
        guilds.store(10, Ordering::SeqCst);
        assert_eq!(host.guild_count(), 10);
    }

    #[test]
    fn test_close_signal() {
        let (controller, host) = BotHost::new(Id::new(1), || 0);
        assert!(!host.is_closed());
        controller.close();
        assert!(host.is_closed());
        assert!(controller.is_closed());
    }

    #[test]
    fn test_dropped_controller_counts_as_closed() {
        let (controller, host) = BotHost::new(Id::new(1), || 0);
        drop(controller);
        assert!(host.is_closed());
    }

    #[tokio::test]
    async fn test_wait_until_ready() {
        let (controller, host) = BotHost::new(Id::new(1), || 0);
        let waiter = host.clone();
        let task = tokio::spawn(async move { waiter.wait_until_ready().await });

        tokio::task::yield_now().await;
        assert!(!host.is_ready());
        controller.mark_ready();

        assert!(task.await.unwrap());
        assert!(host.is_ready());
    }

    #[tokio::test]
    async fn test_wait_until_ready_after_drop() {
        let (controller, host) = BotHost::new(Id::new(1), || 0);
        drop(controller);
        assert!(!host.wait_until_ready().await);
    }

    #[cfg(feature = "twilight")]
    mod twilight {
        use super::*;
        use twilight_cache_inmemory::DefaultInMemoryCache;
        use twilight_model::gateway::payload::incoming::GuildCreate;
        use twilight_model::guild::{
            AfkTimeout, DefaultMessageNotificationLevel, ExplicitContentFilter, Guild, MfaLevel,
            NSFWLevel, PremiumTier, SystemChannelFlags, VerificationLevel,
        };
        use twilight_model::id::marker::GuildMarker;

        fn guild(id: Id<GuildMarker>) -> Guild {
            Guild {
                afk_channel_id: None,
                afk_timeout: AfkTimeout::FIFTEEN_MINUTES,
                application_id: None,
                approximate_member_count: None,
                approximate_presence_count: None,
                banner: None,
                channels: Vec::new(),
                default_message_notifications: DefaultMessageNotificationLevel::Mentions,
                description: None,
                discovery_splash: None,
                emojis: Vec::new(),
                explicit_content_filter: ExplicitContentFilter::None,
                features: Vec::new(),
                guild_scheduled_events: Vec::new(),
                icon: None,
                id,
                joined_at: None,
                large: false,
                max_members: None,
                max_presences: None,
                max_stage_video_channel_users: None,
                max_video_channel_users: None,
                member_count: None,
                members: Vec::new(),
                mfa_level: MfaLevel::None,
                name: format!("guild {}", id),
                nsfw_level: NSFWLevel::Default,
                owner_id: Id::new(1),
                owner: None,
                permissions: None,
                preferred_locale: "ko".to_owned(),
                premium_progress_bar_enabled: false,
                premium_subscription_count: None,
                premium_tier: PremiumTier::None,
                presences: Vec::new(),
                public_updates_channel_id: None,
                roles: Vec::new(),
                rules_channel_id: None,
                safety_alerts_channel_id: None,
                splash: None,
                stage_instances: Vec::new(),
                stickers: Vec::new(),
                system_channel_flags: SystemChannelFlags::empty(),
                system_channel_id: None,
                threads: Vec::new(),
                unavailable: Some(false),
                vanity_url_code: None,
                verification_level: VerificationLevel::None,
                voice_states: Vec::new(),
                widget_channel_id: None,
                widget_enabled: None,
            }
        }

        #[test]
        fn test_guild_count_from_cache() {
            let cache = Arc::new(DefaultInMemoryCache::new());
            let (_controller, host) = BotHost::from_cache(Id::new(1), Arc::clone(&cache));
            assert_eq!(host.guild_count(), 0);

            for id in 1..=3 {
                cache.update(&GuildCreate::Available(guild(Id::new(id))));
            }
            assert_eq!(host.guild_count(), 3);
        }
    }
}
