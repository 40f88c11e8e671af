//! Autopost: periodic guild count submission
//!
//! Once the host is ready, the loop posts the live guild count, then sleeps
//! for the configured interval. A 429 from the bot-list is logged and the
//! next cycle runs on schedule; any other error ends the task and becomes
//! its output. Shutdown is checked once per cycle, so a closed host is
//! noticed after at most one interval. [`AutopostHandle::abort`] stops the
//! task immediately.

use crate::config::AutopostConfig;
use crate::error::{BotListError, BotListResult};
use crate::host::BotHost;
use crate::platform::Platform;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A bot-list that accepts guild count submissions
#[async_trait]
pub trait StatsPoster: Send + Sync + 'static {
    fn platform(&self) -> Platform;

    async fn post_guild_count(
        &self,
        guild_count: usize,
        shard_count: Option<u64>,
    ) -> BotListResult<()>;
}

/// Handle to a running autopost task
#[derive(Debug)]
pub struct AutopostHandle {
    platform: Platform,
    interval: Duration,
    task: JoinHandle<BotListResult<()>>,
}

impl AutopostHandle {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task now instead of at the next shutdown check
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the task to end and return the error that stopped it, if any
    pub async fn join(self) -> BotListResult<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

/// Spawn the autopost loop on the current Tokio runtime
pub fn spawn_autopost<P>(
    poster: Arc<P>,
    host: BotHost,
    config: AutopostConfig,
) -> BotListResult<AutopostHandle>
where
    P: StatsPoster,
{
    config.validate()?;
    let runtime = Handle::try_current().map_err(|_| {
        BotListError::config("autopost must be started from within a Tokio runtime")
    })?;

    let platform = poster.platform();
    let interval = config.interval();
    debug!("Starting {} autopost every {:?}", platform, interval);
    let task = runtime.spawn(run_autopost(poster, host, interval));

    Ok(AutopostHandle {
        platform,
        interval,
        task,
    })
}

/// Body of the autopost task
pub async fn run_autopost<P>(
    poster: Arc<P>,
    host: BotHost,
    interval: Duration,
) -> BotListResult<()>
where
    P: StatsPoster + ?Sized,
{
    let platform = poster.platform();

    if !host.wait_until_ready().await {
        debug!("Host went away before becoming ready, {} autopost not started", platform);
        return Ok(());
    }

    while !host.is_closed() {
        let guild_count = host.guild_count();
        info!("Autoposting guild count ({}) to {}.", guild_count, platform);

        match poster.post_guild_count(guild_count, host.shard_count()).await {
            Ok(()) => {}
            Err(e) if e.is_rate_limited() => {
                warn!(
                    "Failed autopost guild count to {}. (Too Many Requests(429))",
                    platform
                );
            }
            Err(e) => {
                error!("{} autopost stopped: {}", platform, e);
                return Err(e);
            }
        }

        tokio::time::sleep(interval).await;
    }

    debug!("Host closed, {} autopost finished", platform);
    Ok(())
}
