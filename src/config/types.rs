use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::url::{ListingUrlTemplate, DEFAULT_LISTING_URL};
use crate::ConfigError;

/// Main configuration structure for Gondola
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON category tree, relative to the settings file
    #[serde(rename = "categories-path")]
    pub categories_path: PathBuf,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Listing URL template with `{category}` and `{page}` placeholders
    #[serde(rename = "listing-url", default = "default_listing_url")]
    pub listing_url: String,

    /// Maximum number of pages fetched per subcategory
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Retries for a page that failed transiently
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries of the same page (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Number of page sessions that may be open at once
    #[serde(
        rename = "max-concurrent-sessions",
        default = "default_max_concurrent_sessions"
    )]
    pub max_concurrent_sessions: u32,

    /// Per-request timeout (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn listing_template(&self) -> Result<ListingUrlTemplate, ConfigError> {
        ListingUrlTemplate::new(&self.listing_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing-url: {}", e)))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            max_pages: default_max_pages(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_concurrent_sessions: default_max_concurrent_sessions(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_listing_url() -> String {
    DEFAULT_LISTING_URL.to_string()
}

fn default_max_pages() -> u32 {
    500
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_max_concurrent_sessions() -> u32 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_crawler_name() -> String {
    "Gondola".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<subcategory-path>.json` per subcategory
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}
