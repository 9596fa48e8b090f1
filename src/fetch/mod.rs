mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;

/// Fetches `url` and returns the raw response body.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches `url` and decodes the response body as JSON.
///
/// Used for the feeds that speak plain JSON (weather, rail arrivals); the
/// GTFS-RT feeds go through [`fetch_bytes`] and the protobuf parser instead.
pub async fn fetch_json<C: HttpClient>(client: &C, url: &str) -> Result<serde_json::Value> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.json().await?)
}
