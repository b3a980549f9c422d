//! Geotag collector.
//!
//! Searches VK photos around a point within a time window and saves the
//! geotags to CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geotags::config::{Config, DEFAULT_API_VERSION};
use geotags::fetch_geotags;
use geotags::models::{parse_utc_timestamp, SearchQuery, SortOrder, DEFAULT_RADIUS, RADIUS_CHOICES};

#[derive(Parser, Debug)]
#[command(name = "geotags")]
#[command(about = "Collect geotagged VK photos into a CSV file")]
struct Args {
    /// Search text (descriptions, titles, tags); empty matches all photos
    #[arg(short, long, default_value = "")]
    query: String,

    /// Latitude of the search center in decimal degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the search center in decimal degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    long: f64,

    /// Search radius in meters: 10, 100, 800, 6000 or 50000
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: u32,

    /// Photos uploaded not earlier than this time (UTC unless an offset is given)
    #[arg(long, value_parser = parse_utc_timestamp)]
    start: DateTime<Utc>,

    /// Photos uploaded no later than this time (UTC unless an offset is given)
    #[arg(long, value_parser = parse_utc_timestamp)]
    end: DateTime<Utc>,

    /// Sort order: date or likes
    #[arg(long, default_value_t = SortOrder::ByDate)]
    sort: SortOrder,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// TOML config with API credentials and fetch policy
    #[arg(short, long, default_value = "geotags.toml")]
    config: PathBuf,

    /// VK service token (overrides the config file)
    #[arg(long, env = "VK_SERVICE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// VK API version (overrides the config file)
    #[arg(long, env = "VK_API_VERSION")]
    api_version: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    fn search_query(&self) -> SearchQuery {
        SearchQuery::new(
            self.query.clone(),
            self.lat,
            self.long,
            self.radius,
            self.start,
            self.end,
            self.sort,
        )
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = if args.config.exists() {
        Config::load_from_file(&args.config)
            .with_context(|| format!("Failed to load {}", args.config.display()))?
    } else if let Some(token) = &args.token {
        info!(
            "No config at {}, using default endpoint and policy",
            args.config.display()
        );
        Config::with_credentials(DEFAULT_API_VERSION, token.clone())
    } else {
        anyhow::bail!(
            "Config file {} not found and no --token / VK_SERVICE_TOKEN given",
            args.config.display()
        );
    };

    if let Some(token) = &args.token {
        config.api.access_token = token.clone();
    }
    if let Some(version) = &args.api_version {
        config.api.version = version.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging, RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;
    let query = args.search_query();

    if !query.has_documented_radius() {
        warn!(
            "Radius {}m is not one of {:?}, the API will likely reject it",
            query.radius, RADIUS_CHOICES
        );
    }
    if query.end < query.start {
        warn!("End time is before start time, expect no results");
    }

    info!("Starting geotag collection...");
    info!(
        "Location: ({}, {}), Radius: {}m",
        query.latitude, query.longitude, query.radius
    );
    info!(
        "Time period: {} to {}",
        query.start.to_rfc3339(),
        query.end.to_rfc3339()
    );

    let report = fetch_geotags(&config, &query, &args.output)
        .await
        .context("Geotag collection failed")?;

    info!(
        "Done! {} records saved to {} ({} of {} items lacked geodata)",
        report.records_kept,
        args.output.display(),
        report.items_dropped,
        report.items_received
    );

    Ok(())
}
