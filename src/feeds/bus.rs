//! GTFS-RT bus feed fetcher.
//!
//! Covers both the vehicle-position and trip-update endpoints: the protobuf
//! body is decoded and re-serialized to JSON so the cache and the API layer
//! can treat it as an opaque `{header, entity: [...]}` value.

use super::FeedSource;
use crate::cache::FeedId;
use crate::fetch::{BasicClient, fetch_bytes};
use crate::parser::parse_feed;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub struct GtfsRtSource {
    feed: FeedId,
    client: BasicClient,
    url: String,
}

impl GtfsRtSource {
    pub fn new(feed: FeedId, url: String) -> Self {
        Self {
            feed,
            client: BasicClient::new(),
            url,
        }
    }
}

#[async_trait]
impl FeedSource for GtfsRtSource {
    fn feed(&self) -> FeedId {
        self.feed
    }

    async fn fetch(&self) -> Result<Value> {
        let bytes = fetch_bytes(&self.client, &self.url).await?;
        let feed = parse_feed(&bytes)?;
        Ok(serde_json::to_value(&feed)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::gtfs_rt::{FeedEntity, FeedHeader, FeedMessage};

    #[test]
    fn test_decoded_feed_serializes_with_entity_list() {
        let feed = FeedMessage {
            header: FeedHeader {
                gtfs_realtime_version: "2.0".to_string(),
                timestamp: Some(1234567890),
                incrementality: None,
                feed_version: None,
            },
            entity: vec![FeedEntity {
                id: "1001".to_string(),
                ..Default::default()
            }],
        };

        let value = serde_json::to_value(&feed).unwrap();
        let entities = value["entity"].as_array().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["id"], "1001");
    }
}
