//! HTTP API over the cache.
//!
//! Handlers only read the store; fetching is the refresh loop's job. Every
//! route answers 200 with either the cached payload or a fixed default, so a
//! cold cache or a broken upstream never surfaces as an error to clients.

use crate::cache::{CacheStore, FeedId};
use crate::feeds::TrainArrival;
use crate::status::{self, SystemStatus};
use crate::updates::{self, Update};
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

pub fn router(store: Arc<CacheStore>) -> Router {
    Router::new()
        .route("/api/weather", get(weather))
        .route("/api/buses/positions", get(bus_positions))
        .route("/api/buses/trips", get(bus_trips))
        .route("/api/trains", get(trains))
        .route("/api/status", get(system_status))
        .route("/api/updates", get(recent_updates))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn weather(State(store): State<Arc<CacheStore>>) -> Json<Value> {
    Json(weather_payload(&store))
}

async fn bus_positions(State(store): State<Arc<CacheStore>>) -> Json<Value> {
    Json(gtfs_rt_payload(&store, FeedId::BusPositions))
}

async fn bus_trips(State(store): State<Arc<CacheStore>>) -> Json<Value> {
    Json(gtfs_rt_payload(&store, FeedId::BusTrips))
}

async fn trains(State(store): State<Arc<CacheStore>>) -> Json<Value> {
    Json(trains_payload(&store))
}

async fn system_status(State(store): State<Arc<CacheStore>>) -> Json<SystemStatus> {
    Json(status_payload(&store))
}

async fn recent_updates(State(store): State<Arc<CacheStore>>) -> Json<Vec<Update>> {
    Json(updates_payload(&store))
}

fn weather_payload(store: &CacheStore) -> Value {
    store.value(FeedId::Weather).unwrap_or_else(|| {
        json!({
            "temperature": 72,
            "condition": "Partly Cloudy",
        })
    })
}

fn gtfs_rt_payload(store: &CacheStore, feed: FeedId) -> Value {
    store
        .value(feed)
        .unwrap_or_else(|| json!({ "entity": [] }))
}

fn trains_payload(store: &CacheStore) -> Value {
    store.value(FeedId::Train).unwrap_or_else(|| json!([]))
}

fn status_payload(store: &CacheStore) -> SystemStatus {
    match train_snapshot(store) {
        Ok(arrivals) => status::system_status(&arrivals),
        Err(e) => {
            warn!(error = %e, "Cached train snapshot unreadable, serving fallback status");
            status::fallback_status()
        }
    }
}

fn updates_payload(store: &CacheStore) -> Vec<Update> {
    match train_snapshot(store) {
        Ok(arrivals) => updates::recent_updates(weather_condition(store).as_deref(), &arrivals),
        Err(e) => {
            warn!(error = %e, "Cached train snapshot unreadable, serving fallback updates");
            updates::fallback_updates()
        }
    }
}

/// Typed view of the cached train feed; an empty cache reads as no arrivals.
fn train_snapshot(store: &CacheStore) -> Result<Vec<TrainArrival>, serde_json::Error> {
    match store.value(FeedId::Train) {
        Some(value) => serde_json::from_value(value),
        None => Ok(Vec::new()),
    }
}

fn weather_condition(store: &CacheStore) -> Option<String> {
    let report = store.value(FeedId::Weather)?;
    report
        .get("condition")
        .and_then(Value::as_str)
        .map(str::to_string)
}
