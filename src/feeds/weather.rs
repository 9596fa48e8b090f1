//! Open-Meteo current-conditions fetcher.

use super::FeedSource;
use crate::cache::FeedId;
use crate::config::Config;
use crate::fetch::{BasicClient, fetch_json};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The weather payload served on `/api/weather`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub temperature: i64,
    pub condition: String,
    pub humidity: i64,
    pub feels_like: i64,
    pub city: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    weather_code: u32,
}

pub struct WeatherSource {
    client: BasicClient,
    url: String,
    city: String,
}

impl WeatherSource {
    pub fn new(config: &Config) -> Self {
        let url = format!(
            "{}?latitude={}&longitude={}\
             &current=temperature_2m,apparent_temperature,relative_humidity_2m,weather_code\
             &temperature_unit=fahrenheit&timezone=America%2FNew_York",
            config.weather_api_url, config.latitude, config.longitude,
        );

        Self {
            client: BasicClient::new(),
            url,
            city: config.city.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for WeatherSource {
    fn feed(&self) -> FeedId {
        FeedId::Weather
    }

    async fn fetch(&self) -> Result<Value> {
        let raw = fetch_json(&self.client, &self.url).await?;
        let forecast: ForecastResponse =
            serde_json::from_value(raw).context("unexpected forecast response shape")?;

        let current = forecast.current;
        let report = WeatherReport {
            temperature: current.temperature_2m.round() as i64,
            condition: wmo_condition(current.weather_code).to_string(),
            humidity: current.relative_humidity_2m.round() as i64,
            feels_like: current.apparent_temperature.round() as i64,
            city: self.city.clone(),
        };

        Ok(serde_json::to_value(report)?)
    }
}

/// Maps a WMO weather code to a human-readable condition.
pub fn wmo_condition(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
