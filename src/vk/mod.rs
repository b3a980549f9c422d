//! VK photo search: HTTP client and pagination.

pub mod client;
pub mod fetcher;

pub use client::{build_search_url, parse_search_response, PhotoSearch, SearchPage, VkClient};
pub use fetcher::{FetchReport, GeotagFetcher};
