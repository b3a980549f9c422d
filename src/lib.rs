//! Geotags - collect geotagged photos from VK photo search into CSV
//!
//! This library provides the search client, pagination and export used by the
//! `geotags` binary.

use std::path::Path;

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod vk;

pub use config::{ApiConfig, Config, FetchPolicy};
pub use error::{GeotagError, GeotagResult};
pub use models::{PhotoRecord, ResultSet, SearchQuery, SortOrder};
pub use vk::{FetchReport, GeotagFetcher, VkClient};

/// Search for geotagged photos and write them to `output_path` as CSV
pub async fn fetch_geotags(
    config: &Config,
    query: &SearchQuery,
    output_path: &Path,
) -> GeotagResult<FetchReport> {
    let client = VkClient::new(config.api.clone())?;
    GeotagFetcher::new(client, config.fetch.clone())
        .fetch_to_csv(query, output_path)
        .await
}
