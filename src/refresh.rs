//! Background refresh loop.
//!
//! The single writer to the [`CacheStore`]. Every tick it walks the sources
//! in a fixed order, re-fetching only the stale feeds. A failed fetch leaves
//! the previous value in place so handlers keep serving stale data, and any
//! failure in a cycle stretches the next sleep to the backoff interval so a
//! broken upstream isn't hammered.

use crate::cache::CacheStore;
use crate::feeds::FeedSource;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TICK: Duration = Duration::from_secs(10);
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(30);

pub struct RefreshLoop {
    store: Arc<CacheStore>,
    sources: Vec<Box<dyn FeedSource>>,
    tick: Duration,
    backoff: Duration,
}

impl RefreshLoop {
    pub fn new(store: Arc<CacheStore>, sources: Vec<Box<dyn FeedSource>>) -> Self {
        Self {
            store,
            sources,
            tick: DEFAULT_TICK,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_intervals(mut self, tick: Duration, backoff: Duration) -> Self {
        self.tick = tick;
        self.backoff = backoff;
        self
    }

    /// Runs refresh cycles until the task is dropped at shutdown.
    pub async fn run(self) {
        info!(
            tick_secs = self.tick.as_secs(),
            backoff_secs = self.backoff.as_secs(),
            "Refresh loop started"
        );

        loop {
            let failures = self.run_cycle().await;

            let sleep = if failures > 0 { self.backoff } else { self.tick };
            if failures > 0 {
                warn!(failures, backoff_secs = sleep.as_secs(), "Cycle had fetch failures, backing off");
            }
            tokio::time::sleep(sleep).await;
        }
    }

    /// Refreshes every stale feed once, in order. Returns the failure count.
    ///
    /// One source failing never stops the remaining sources from being
    /// attempted in the same cycle.
    pub async fn run_cycle(&self) -> usize {
        let mut failures = 0;

        for source in &self.sources {
            let feed = source.feed();

            if !self.store.is_stale(feed, Utc::now()) {
                debug!(feed = feed.name(), "Feed still fresh, skipping");
                continue;
            }

            match source.fetch().await {
                Ok(value) => {
                    self.store.put(feed, value, Utc::now());
                    info!(feed = feed.name(), "Feed refreshed");
                }
                Err(e) => {
                    failures += 1;
                    warn!(feed = feed.name(), error = %e, "Feed fetch failed, keeping last known value");
                }
            }
        }

        failures
    }
}
