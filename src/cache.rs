//! In-memory cache shared between the refresh loop and the API handlers.
//!
//! One [`CacheEntry`] per feed, keyed by [`FeedId`]. The refresh loop is the
//! only writer; request handlers read concurrently. Staleness only controls
//! whether the loop re-fetches a feed, it never hides the stored value.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Identifies one of the four upstream data feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedId {
    Weather,
    BusPositions,
    BusTrips,
    Train,
}

impl FeedId {
    /// All feeds, in the order the refresh loop visits them.
    pub const ALL: [FeedId; 4] = [
        FeedId::Weather,
        FeedId::BusPositions,
        FeedId::BusTrips,
        FeedId::Train,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeedId::Weather => "weather",
            FeedId::BusPositions => "bus_positions",
            FeedId::BusTrips => "bus_trips",
            FeedId::Train => "train",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FeedId::ALL.into_iter().find(|f| f.name() == name)
    }

    /// How long a fetched value stays fresh before the loop re-fetches it.
    pub fn default_ttl(self) -> Duration {
        match self {
            FeedId::Weather => Duration::seconds(900),
            FeedId::BusPositions => Duration::seconds(30),
            FeedId::BusTrips => Duration::seconds(60),
            FeedId::Train => Duration::seconds(30),
        }
    }
}

/// Last-known value for a single feed.
///
/// `value` and `last_fetched` are only ever set together by
/// [`CacheStore::put`], so a populated value always has a fetch timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Option<Value>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub ttl: Duration,
}

impl CacheEntry {
    fn empty(ttl: Duration) -> Self {
        Self {
            value: None,
            last_fetched: None,
            ttl,
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetched {
            Some(fetched) => now.signed_duration_since(fetched) > self.ttl,
            None => true,
        }
    }
}

/// Thread-safe store of all feed entries.
///
/// Lock discipline: the lock is held only around the map access, never across
/// network I/O.
pub struct CacheStore {
    entries: RwLock<HashMap<FeedId, CacheEntry>>,
}

impl CacheStore {
    /// Creates the store with every feed empty at its default TTL.
    pub fn new() -> Self {
        let entries = FeedId::ALL
            .into_iter()
            .map(|feed| (feed, CacheEntry::empty(feed.default_ttl())))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Returns a snapshot of the entry for `feed`. Total: never blocks beyond
    /// the read lock and never fails.
    pub fn get(&self, feed: FeedId) -> CacheEntry {
        let entries = self.entries.read().expect("cache lock poisoned");
        entries
            .get(&feed)
            .cloned()
            .unwrap_or_else(|| CacheEntry::empty(feed.default_ttl()))
    }

    /// Returns just the cached value for `feed`, if one has ever been fetched.
    pub fn value(&self, feed: FeedId) -> Option<Value> {
        self.get(feed).value
    }

    /// Overwrites the value and fetch timestamp for `feed`. The only mutator.
    pub fn put(&self, feed: FeedId, value: Value, fetched_at: DateTime<Utc>) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let entry = entries
            .entry(feed)
            .or_insert_with(|| CacheEntry::empty(feed.default_ttl()));
        entry.value = Some(value);
        entry.last_fetched = Some(fetched_at);
    }

    pub fn is_stale(&self, feed: FeedId, now: DateTime<Utc>) -> bool {
        self.get(feed).is_stale(now)
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_never_fetched_feeds_are_stale() {
        let store = CacheStore::new();
        let now = Utc::now();

        for feed in FeedId::ALL {
            assert!(store.is_stale(feed, now), "{} should start stale", feed.name());
            assert!(store.value(feed).is_none());
        }
    }

    #[test]
    fn test_put_makes_entry_fresh() {
        let store = CacheStore::new();
        let now = Utc::now();

        store.put(FeedId::Train, json!([]), now);

        assert!(!store.is_stale(FeedId::Train, now));
        assert_eq!(store.value(FeedId::Train), Some(json!([])));
    }

    #[test]
    fn test_entry_goes_stale_after_ttl() {
        let store = CacheStore::new();
        let fetched = Utc::now();

        store.put(FeedId::Train, json!([]), fetched);

        let within_ttl = fetched + Duration::seconds(30);
        let past_ttl = fetched + Duration::seconds(31);
        assert!(!store.is_stale(FeedId::Train, within_ttl));
        assert!(store.is_stale(FeedId::Train, past_ttl));
    }

    #[test]
    fn test_stale_entry_still_returns_value() {
        let store = CacheStore::new();
        let fetched = Utc::now();

        store.put(FeedId::Weather, json!({"temperature": 68}), fetched);

        let much_later = fetched + Duration::hours(2);
        assert!(store.is_stale(FeedId::Weather, much_later));
        assert_eq!(
            store.value(FeedId::Weather),
            Some(json!({"temperature": 68}))
        );
    }

    #[test]
    fn test_put_overwrites_previous_value() {
        let store = CacheStore::new();

        store.put(FeedId::Weather, json!({"temperature": 68}), Utc::now());
        store.put(FeedId::Weather, json!({"temperature": 71}), Utc::now());

        assert_eq!(
            store.value(FeedId::Weather),
            Some(json!({"temperature": 71}))
        );
    }

    #[test]
    fn test_feeds_are_independent() {
        let store = CacheStore::new();
        let now = Utc::now();

        store.put(FeedId::BusPositions, json!({"entity": []}), now);

        assert!(!store.is_stale(FeedId::BusPositions, now));
        assert!(store.is_stale(FeedId::BusTrips, now));
        assert!(store.value(FeedId::BusTrips).is_none());
    }

    #[test]
    fn test_feed_name_round_trip() {
        for feed in FeedId::ALL {
            assert_eq!(FeedId::from_name(feed.name()), Some(feed));
        }
        assert_eq!(FeedId::from_name("ferries"), None);
    }
}
