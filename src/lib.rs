//! Gondola: a paginated product-catalog crawler
//!
//! This crate walks a tree of retail product categories, paginates through
//! each subcategory's listing pages, extracts the schema.org Product/Offer
//! microdata embedded in every product entry, and writes one JSON result
//! set of in-stock products per subcategory.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Gondola operations
#[derive(Debug, Error)]
pub enum GondolaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch page {cursor} of '{path}': {source}")]
    Fetch {
        path: String,
        cursor: u32,
        source: FetchError,
    },

    #[error("Page cap of {max_pages} reached for '{path}' before an empty page was seen")]
    PageCapExceeded { path: String, max_pages: u32 },

    #[error("Result sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Crawl task for '{path}' did not finish: {message}")]
    Task { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse category document: {0}")]
    Categories(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while retrieving one listing page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {code}")]
    Status { code: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Invalid listing URL: {0}")]
    InvalidUrl(#[from] UrlError),
}

impl FetchError {
    /// Returns true if retrying the same page may succeed
    ///
    /// Server errors, rate limiting, network failures and truncated bodies
    /// are transient. Any other HTTP status or a bad URL is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { code } => *code >= 500 || *code == 429,
            Self::Network(_) | Self::Body(_) => true,
            Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors raised while decoding one product fragment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),

    /// Malformed markup narrowed to the one required property that is absent
    #[error("Missing property '{property}' in {schema} block")]
    MissingProperty {
        schema: &'static str,
        property: &'static str,
    },

    #[error("Invalid price: '{0}'")]
    InvalidPrice(String),
}

impl ExtractionError {
    /// Returns true if the structured data is absent or incomplete
    ///
    /// `MissingProperty` counts as malformed markup; only an unreadable
    /// price does not.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedMarkup(_) | Self::MissingProperty { .. }
        )
    }
}

/// Errors raised while persisting a crawl result
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write result file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid category path: {0}")]
    InvalidPath(String),
}

/// Result type alias for Gondola operations
pub type Result<T> = std::result::Result<T, GondolaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use catalog::{Category, CrawlResult, ProductRecord, Subcategory};
pub use config::Config;
pub use crawler::{run_crawl, Orchestrator, Paginator};
pub use output::{CrawlReport, JsonFileSink, ResultSink};
