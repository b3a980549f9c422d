use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.vk.com/method/photos.search";
pub const DEFAULT_API_VERSION: &str = "5.131";

/// The API refuses page sizes above this
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
/// The API stops paginating after 3000 results
pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_version")]
    pub version: String,
    /// Service token of the VK application
    pub access_token: String,
}

/// Pagination policy for one search
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FetchPolicy {
    /// Items requested per page (default 1000)
    pub page_size: u32,
    /// Upper bound on requests per search (default 3)
    pub max_pages: u32,
    /// Pause between consecutive pages in milliseconds (default 500)
    pub page_delay_ms: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
        }
    }
}

impl FetchPolicy {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Offset of every page the policy allows, in request order.
    ///
    /// Ends early once an offset no longer fits in `u32`.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.max_pages).map_while(move |page| page.checked_mul(self.page_size))
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl ApiConfig {
    pub fn new(version: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            version: version.into(),
            access_token: access_token.into(),
        }
    }
}

impl Config {
    /// Config with default endpoint and policy around the given credentials
    pub fn with_credentials(version: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::new(version, access_token),
            fetch: FetchPolicy::default(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            access_token = "service-token"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.version, DEFAULT_API_VERSION);
        assert_eq!(config.api.access_token, "service-token");
        assert_eq!(config.fetch, FetchPolicy::default());
        assert_eq!(config.fetch.page_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_fetch_section() {
        let config = Config::from_toml(
            r#"
            [api]
            version = "5.199"
            access_token = "t"

            [fetch]
            page_size = 50
            page_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.version, "5.199");
        assert_eq!(config.fetch.page_size, 50);
        assert_eq!(config.fetch.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.fetch.page_delay(), Duration::ZERO);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(Config::from_toml("[api]\nversion = \"5.131\"\n").is_err());
    }

    #[test]
    fn test_default_offsets() {
        let offsets: Vec<u32> = FetchPolicy::default().offsets().collect();
        assert_eq!(offsets, vec![0, 1000, 2000]);
    }

    #[test]
    fn test_offsets_stop_before_overflow() {
        let policy = FetchPolicy {
            page_size: 3_000_000_000,
            max_pages: 3,
            page_delay_ms: 0,
        };
        let offsets: Vec<u32> = policy.offsets().collect();
        assert_eq!(offsets, vec![0, 3_000_000_000]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotags.toml");
        fs::write(&path, "[api]\naccess_token = \"abc\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, Config::with_credentials(DEFAULT_API_VERSION, "abc"));
        assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
