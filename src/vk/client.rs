//! `photos.search` client.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{GeotagError, GeotagResult};
use crate::models::{PhotoItem, SearchQuery};

const USER_AGENT: &str = concat!("geotags/", env!("CARGO_PKG_VERSION"));

/// Longest response excerpt carried in an error message
const BODY_EXCERPT_LEN: usize = 200;

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Total number of matches reported by the server
    pub count: u64,
    pub items: Vec<PhotoItem>,
}

/// Source of search result pages
pub trait PhotoSearch {
    /// Fetch `count` items starting at `offset`
    fn search_page(
        &self,
        query: &SearchQuery,
        count: u32,
        offset: u32,
    ) -> impl Future<Output = GeotagResult<SearchPage>> + Send;
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: Option<SearchBody>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    items: Vec<PhotoItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: Option<i64>,
    error_msg: Option<String>,
}

/// HTTP client for the VK photo search endpoint
pub struct VkClient {
    client: Client,
    api: ApiConfig,
}

impl VkClient {
    pub fn new(api: ApiConfig) -> GeotagResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, api })
    }
}

impl PhotoSearch for VkClient {
    async fn search_page(
        &self,
        query: &SearchQuery,
        count: u32,
        offset: u32,
    ) -> GeotagResult<SearchPage> {
        let url = build_search_url(&self.api, query, count, offset)?;

        // The URL carries the access token, so only the paging is logged
        debug!("Requesting photos.search count={} offset={}", count, offset);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeotagError::api(format!(
                "HTTP {}: {}",
                status,
                excerpt(&body)
            )));
        }

        parse_search_response(&body)
    }
}

/// Build the request URL for one page
pub fn build_search_url(
    api: &ApiConfig,
    query: &SearchQuery,
    count: u32,
    offset: u32,
) -> GeotagResult<Url> {
    let params = [
        ("q", query.text.clone()),
        ("lat", query.latitude.to_string()),
        ("long", query.longitude.to_string()),
        ("radius", query.radius.to_string()),
        ("start_time", query.start_unix().to_string()),
        ("end_time", query.end_unix().to_string()),
        ("count", count.to_string()),
        ("offset", offset.to_string()),
        ("sort", query.sort.wire_value().to_string()),
        ("v", api.version.clone()),
        ("access_token", api.access_token.clone()),
    ];

    Url::parse_with_params(&api.endpoint, &params)
        .map_err(|e| GeotagError::api(format!("Invalid endpoint '{}': {}", api.endpoint, e)))
}

/// Parse a `photos.search` response body
pub fn parse_search_response(body: &str) -> GeotagResult<SearchPage> {
    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|e| {
        GeotagError::api(format!("Malformed response ({}): {}", e, excerpt(body)))
    })?;

    if let Some(error) = envelope.error {
        return Err(GeotagError::Api {
            code: error.error_code,
            message: error
                .error_msg
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let body = envelope
        .response
        .ok_or_else(|| GeotagError::api("Response has no 'response' object"))?;

    Ok(SearchPage {
        count: body.count,
        items: body.items,
    })
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
