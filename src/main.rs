//! CLI entry point for the transit dashboard.
//!
//! `serve` runs the HTTP API together with the background refresh loop;
//! `fetch` does a one-shot fetch of a single feed for debugging.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_dashboard::{
    cache::{CacheStore, FeedId},
    config::Config,
    feeds,
    refresh::RefreshLoop,
    server,
};

#[derive(Parser)]
#[command(name = "transit_dashboard")]
#[command(about = "Real-time transit and weather dashboard API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard API with the background feed refresher
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5001)]
        port: u16,

        /// Seconds between refresh cycles
        #[arg(long, default_value_t = 10)]
        tick: u64,

        /// Seconds to wait after a cycle with fetch failures
        #[arg(long, default_value_t = 30)]
        backoff: u64,
    },
    /// Fetch one feed once and print its payload as JSON
    Fetch {
        /// Feed name: weather, bus_positions, bus_trips, or train
        #[arg(value_name = "FEED")]
        feed: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/transit_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            tick,
            backoff,
        } => {
            serve(&bind, port, tick, backoff).await?;
        }
        Commands::Fetch { feed } => {
            fetch_once(&feed).await?;
        }
    }

    Ok(())
}

async fn serve(bind: &str, port: u16, tick: u64, backoff: u64) -> Result<()> {
    let config = Config::from_env()?;

    let store = Arc::new(CacheStore::new());
    let sources = feeds::all_sources(&config);

    let refresh = RefreshLoop::new(store.clone(), sources)
        .with_intervals(Duration::from_secs(tick), Duration::from_secs(backoff));
    let refresher = tokio::spawn(refresh.run());

    let app = server::router(store);
    let listener = tokio::net::TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("failed to bind {bind}:{port}"))?;

    info!(addr = %listener.local_addr()?, "Dashboard API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The refresh task holds no state outside the store, so it is safe to
    // drop mid-cycle once the server has drained.
    refresher.abort();
    info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

/// Fetches a single feed outside the cache/refresh machinery.
async fn fetch_once(feed_name: &str) -> Result<()> {
    let Some(feed) = FeedId::from_name(feed_name) else {
        bail!("unknown feed '{feed_name}' (expected weather, bus_positions, bus_trips, or train)");
    };

    let config = Config::from_env()?;
    let sources = feeds::all_sources(&config);
    let source = sources
        .iter()
        .find(|s| s.feed() == feed)
        .context("feed has no configured source")?;

    let value = source.fetch().await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
