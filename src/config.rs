//! Environment-driven configuration for the feed fetchers.
//!
//! URLs and coordinates default to MARTA / Atlanta; everything can be
//! overridden through the environment (loaded from `.env` by the binary).

use anyhow::{Context, Result};

pub const DEFAULT_TRAIN_API_URL: &str =
    "https://developerservices.itsmarta.com:18096/itsmarta/railrealtimearrivals/developerservices/traindata";
pub const DEFAULT_BUS_POSITIONS_URL: &str =
    "https://gtfs-rt.itsmarta.com/TMGTFSRealTimeWebService/vehicle/vehiclepositions.pb";
pub const DEFAULT_BUS_TRIPS_URL: &str =
    "https://gtfs-rt.itsmarta.com/TMGTFSRealTimeWebService/tripupdate/tripupdates.pb";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone)]
pub struct Config {
    pub marta_api_key: String,
    pub train_api_url: String,
    pub bus_positions_url: String,
    pub bus_trips_url: String,
    pub weather_api_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails if `MARTA_API_KEY` is unset or a coordinate override does not
    /// parse as a float.
    pub fn from_env() -> Result<Self> {
        let marta_api_key =
            std::env::var("MARTA_API_KEY").context("MARTA_API_KEY must be set")?;

        Ok(Self {
            marta_api_key,
            train_api_url: env_or("MARTA_TRAIN_API_URL", DEFAULT_TRAIN_API_URL),
            bus_positions_url: env_or("MARTA_BUS_POSITIONS_URL", DEFAULT_BUS_POSITIONS_URL),
            bus_trips_url: env_or("MARTA_BUS_TRIPS_URL", DEFAULT_BUS_TRIPS_URL),
            weather_api_url: env_or("WEATHER_API_URL", DEFAULT_WEATHER_API_URL),
            latitude: env_or("WEATHER_LATITUDE", "33.749")
                .parse()
                .context("WEATHER_LATITUDE must be a number")?,
            longitude: env_or("WEATHER_LONGITUDE", "-84.388")
                .parse()
                .context("WEATHER_LONGITUDE must be a number")?,
            city: env_or("WEATHER_CITY", "Atlanta"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
