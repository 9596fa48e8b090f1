//! MARTA rail real-time arrivals fetcher.
//!
//! The upstream API returns a JSON array of arrival records. The cache stores
//! that array unmodified; [`TrainArrival`] is the typed view the status and
//! updates derivations read from it.

use super::FeedSource;
use crate::cache::FeedId;
use crate::config::Config;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, fetch_json};
use anyhow::{Result, ensure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One rail arrival record, in the upstream field naming.
///
/// Unknown upstream fields are ignored; records missing any of the required
/// fields fail deserialization, which the API layer turns into its constant
/// fallback response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainArrival {
    #[serde(rename = "TRAIN_ID", default)]
    pub train_id: Option<String>,
    #[serde(rename = "LINE")]
    pub line: String,
    #[serde(rename = "STATION")]
    pub station: String,
    #[serde(rename = "DESTINATION")]
    pub destination: String,
    /// Raw delay string like `"T700S"` (700 seconds behind schedule).
    #[serde(rename = "DELAY", default)]
    pub delay: Option<String>,
    #[serde(rename = "WAITING_TIME", default)]
    pub waiting_time: Option<String>,
}

impl TrainArrival {
    /// Parses the `T<seconds>S` delay string into signed seconds.
    ///
    /// Returns `None` when the field is absent or not in that shape.
    pub fn delay_seconds(&self) -> Option<i64> {
        let raw = self.delay.as_deref()?;
        raw.strip_prefix('T')?.strip_suffix('S')?.parse().ok()
    }
}

pub struct TrainSource {
    client: UrlParam<BasicClient>,
    url: String,
}

impl TrainSource {
    pub fn new(config: &Config) -> Self {
        Self {
            client: UrlParam {
                inner: BasicClient::new(),
                param_name: "apiKey".to_string(),
                key: config.marta_api_key.clone(),
            },
            url: config.train_api_url.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for TrainSource {
    fn feed(&self) -> FeedId {
        FeedId::Train
    }

    async fn fetch(&self) -> Result<Value> {
        let value = fetch_json(&self.client, &self.url).await?;
        ensure!(value.is_array(), "rail arrivals payload is not an array");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arrival(delay: Option<&str>) -> TrainArrival {
        TrainArrival {
            train_id: Some("303506".to_string()),
            line: "RED".to_string(),
            station: "FIVE POINTS STATION".to_string(),
            destination: "North Springs".to_string(),
            delay: delay.map(str::to_string),
            waiting_time: Some("4 min".to_string()),
        }
    }

    #[test]
    fn test_delay_seconds_positive() {
        assert_eq!(arrival(Some("T700S")).delay_seconds(), Some(700));
    }

    #[test]
    fn test_delay_seconds_negative() {
        assert_eq!(arrival(Some("T-45S")).delay_seconds(), Some(-45));
    }

    #[test]
    fn test_delay_seconds_missing_or_malformed() {
        assert_eq!(arrival(None).delay_seconds(), None);
        assert_eq!(arrival(Some("700")).delay_seconds(), None);
        assert_eq!(arrival(Some("TxS")).delay_seconds(), None);
        assert_eq!(arrival(Some("T700")).delay_seconds(), None);
    }

    #[test]
    fn test_deserializes_upstream_record() {
        let record = json!({
            "DESTINATION": "Airport",
            "DIRECTION": "S",
            "EVENT_TIME": "3/1/2024 12:04:01 PM",
            "LINE": "GOLD",
            "NEXT_ARR": "12:05:21 PM",
            "STATION": "AIRPORT STATION",
            "TRAIN_ID": "301506",
            "WAITING_SECONDS": "-21",
            "WAITING_TIME": "Boarding",
            "DELAY": "T24S"
        });

        let arrival: TrainArrival = serde_json::from_value(record).unwrap();
        assert_eq!(arrival.line, "GOLD");
        assert_eq!(arrival.station, "AIRPORT STATION");
        assert_eq!(arrival.delay_seconds(), Some(24));
    }

    #[test]
    fn test_record_without_line_is_rejected() {
        let record = json!({ "STATION": "MIDTOWN STATION", "DESTINATION": "Doraville" });
        assert!(serde_json::from_value::<TrainArrival>(record).is_err());
    }
}
