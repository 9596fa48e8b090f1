//! One fetcher per upstream feed, behind the [`FeedSource`] trait.
//!
//! Each source makes a single network call and returns the feed payload as
//! JSON, or an error. Sources never touch the cache; the refresh loop decides
//! when to call them and what to do with the result.

pub mod bus;
pub mod train;
pub mod weather;

pub use bus::GtfsRtSource;
pub use train::{TrainArrival, TrainSource};
pub use weather::WeatherSource;

use crate::cache::FeedId;
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Which cache entry this source feeds.
    fn feed(&self) -> FeedId;

    /// Attempts one fetch of the upstream feed.
    async fn fetch(&self) -> Result<Value>;
}

/// Builds all four sources in the order the refresh loop visits them.
pub fn all_sources(config: &Config) -> Vec<Box<dyn FeedSource>> {
    vec![
        Box::new(WeatherSource::new(config)),
        Box::new(GtfsRtSource::new(
            FeedId::BusPositions,
            config.bus_positions_url.clone(),
        )),
        Box::new(GtfsRtSource::new(
            FeedId::BusTrips,
            config.bus_trips_url.clone(),
        )),
        Box::new(TrainSource::new(config)),
    ]
}
