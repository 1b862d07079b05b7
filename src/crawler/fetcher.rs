//! Listing page fetcher
//!
//! This module retrieves one rendered listing page and returns the product
//! fragments found on it:
//! - `ListingFetcher`: the seam every page renderer implements
//! - `HttpListingFetcher`: renders pages with a plain HTTP GET
//! - Error classification into transient and permanent failures

use crate::catalog::ProductFragment;
use crate::config::{Config, UserAgentConfig};
use crate::url::ListingUrlTemplate;
use crate::{FetchError, GondolaError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;

/// Elements tagged as schema.org products
pub const PRODUCT_SELECTOR: &str =
    r#"[itemtype="https://schema.org/Product"], [itemtype="http://schema.org/Product"]"#;

static PRODUCT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(PRODUCT_SELECTOR).expect("product selector is valid"));

/// One fetched listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// The URL that was rendered
    pub url: String,

    /// Product fragments in document order
    pub fragments: Vec<ProductFragment>,
}

impl ListingPage {
    /// An empty page marks the end of a subcategory's catalog
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Retrieves rendered listing pages
///
/// Implementations must report failures as `Err`. Returning an empty page
/// for a failed render would end pagination as if the catalog were
/// exhausted.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Fetches page `cursor` (1-based) of the subcategory at `path`
    async fn fetch_page(&self, path: &str, cursor: u32) -> Result<ListingPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use gondola::config::UserAgentConfig;
/// use gondola::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renders listing pages with an HTTP GET and queries them with `scraper`
pub struct HttpListingFetcher {
    client: Client,
    template: ListingUrlTemplate,
}

impl HttpListingFetcher {
    pub fn new(client: Client, template: ListingUrlTemplate) -> Self {
        Self { client, template }
    }

    /// Builds a fetcher from the crawler and user agent settings
    pub fn from_config(config: &Config) -> Result<Self, GondolaError> {
        let template = config.crawler.listing_template()?;
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        Ok(Self::new(client, template))
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch_page(&self, path: &str, cursor: u32) -> Result<ListingPage, FetchError> {
        let url = self.template.render(path, cursor)?;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(ListingPage {
            url: url.to_string(),
            fragments: product_fragments(&body),
        })
    }
}

/// Collects the outer markup of every product element in a listing page
pub fn product_fragments(html: &str) -> Vec<ProductFragment> {
    let document = Html::parse_document(html);

    document
        .select(&PRODUCT)
        .map(|element| ProductFragment::new(element.html()))
        .collect()
}

fn classify_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network("Request timeout".to_string())
    } else if e.is_connect() {
        FetchError::Network(format!("Connection failed: {}", e))
    } else {
        FetchError::Network(e.to_string())
    }
}
