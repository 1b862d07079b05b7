//! Pagination controller
//!
//! Walks one subcategory's listing pages in strictly increasing cursor
//! order until a page comes back empty, turning every in-stock product
//! fragment into a `ProductRecord`.

use crate::catalog::{CrawlResult, Subcategory};
use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{ListingFetcher, ListingPage};
use crate::crawler::state::{CrawlStats, PageOutcome, PaginationPhase, PaginationState};
use crate::extract::extract;
use crate::{FetchError, GondolaError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

/// The frozen output of one subcategory crawl
#[derive(Debug, Clone)]
pub struct SubcategoryCrawl {
    pub result: CrawlResult,
    pub stats: CrawlStats,

    /// `Exhausted`, or `CapReached` when the page cap cut the crawl short
    pub termination: PaginationPhase,
}

/// Drives a `ListingFetcher` across the pages of one subcategory
///
/// Page sessions are drawn from a shared semaphore: a permit is taken
/// before each fetch and released once that page's fragments have been
/// processed or the fetch has failed.
pub struct Paginator<F> {
    fetcher: Arc<F>,
    sessions: Arc<Semaphore>,
    max_pages: u32,
    max_retries: u32,
    retry_delay: Duration,
}

impl<F: ListingFetcher> Paginator<F> {
    /// Creates a paginator with its own session pool
    pub fn new(fetcher: Arc<F>, settings: &CrawlerConfig) -> Self {
        let sessions = Arc::new(Semaphore::new(settings.max_concurrent_sessions as usize));
        Self::with_sessions(fetcher, sessions, settings)
    }

    /// Creates a paginator drawing from a shared session pool
    pub fn with_sessions(
        fetcher: Arc<F>,
        sessions: Arc<Semaphore>,
        settings: &CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            sessions,
            max_pages: settings.max_pages,
            max_retries: settings.max_retries,
            retry_delay: settings.retry_delay(),
        }
    }

    /// Crawls every listing page of a subcategory
    ///
    /// Records are stamped with `category` and the subcategory name as they
    /// are created. Malformed fragments are skipped and offers that are not
    /// in stock are dropped; neither stops the page.
    ///
    /// # Errors
    ///
    /// Returns `GondolaError::Fetch` when a page still fails after the
    /// configured retries. Records gathered before the failure are dropped
    /// with it, so a failed subcategory never looks like a complete one.
    pub async fn crawl(
        &self,
        category: &str,
        subcategory: &Subcategory,
    ) -> Result<SubcategoryCrawl, GondolaError> {
        let path = subcategory.path.as_str();
        let mut state = PaginationState::new(self.max_pages);

        tracing::info!("Crawling '{}' ({})", subcategory.name, path);

        while let Some(cursor) = state.next_cursor() {
            let (page, _session) = match self.fetch_with_retry(path, cursor, &mut state).await {
                Ok(fetched) => fetched,
                Err(GondolaError::Fetch { path, cursor, source }) => {
                    state.record_failure();
                    tracing::error!("Giving up on '{}' at page {}: {}", path, cursor, source);
                    return Err(GondolaError::Fetch {
                        path,
                        cursor,
                        source,
                    });
                }
                Err(e) => return Err(e),
            };

            let outcome = if state.past_cap() {
                PageOutcome {
                    fragments: page.fragments.len(),
                    ..PageOutcome::default()
                }
            } else {
                process_page(&page, category, &subcategory.name, path, cursor)
            };
            let kept = outcome.records.len();
            let fragments = outcome.fragments;

            match state.record_page(outcome) {
                PaginationPhase::Exhausted => {
                    tracing::debug!("Page {} of '{}' is empty, stopping", cursor, path);
                }
                PaginationPhase::CapReached => {
                    tracing::warn!(
                        "Page {} of '{}' is past the cap of {} pages and not empty, stopping",
                        cursor,
                        path,
                        self.max_pages
                    );
                }
                _ => {
                    tracing::info!(
                        "'{}' page {}: {} products, {} kept",
                        path,
                        cursor,
                        fragments,
                        kept
                    );
                }
            }
        }

        let (result, stats, termination) = state.finish();

        tracing::info!(
            "Finished '{}': {} records from {} pages ({} skipped, {} out of stock)",
            path,
            result.len(),
            stats.pages_fetched,
            stats.fragments_skipped,
            stats.out_of_stock
        );

        Ok(SubcategoryCrawl {
            result,
            stats,
            termination,
        })
    }

    /// Fetches one page, retrying transient failures
    ///
    /// The session permit is returned with the page and is not held while
    /// waiting between retries.
    async fn fetch_with_retry(
        &self,
        path: &str,
        cursor: u32,
        state: &mut PaginationState,
    ) -> Result<(ListingPage, SemaphorePermit<'_>), GondolaError> {
        let mut attempt = 0;

        loop {
            let session = self
                .sessions
                .acquire()
                .await
                .map_err(|_| GondolaError::Task {
                    path: path.to_string(),
                    message: "session pool closed".to_string(),
                })?;

            match self.fetcher.fetch_page(path, cursor).await {
                Ok(page) => return Ok((page, session)),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    drop(session);
                    attempt += 1;
                    state.record_retry();
                    tracing::warn!(
                        "Page {} of '{}' failed ({}), retry {}/{}",
                        cursor,
                        path,
                        e,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(fetch_error(path, cursor, e)),
            }
        }
    }
}

fn fetch_error(path: &str, cursor: u32, source: FetchError) -> GondolaError {
    GondolaError::Fetch {
        path: path.to_string(),
        cursor,
        source,
    }
}

/// Extracts and filters every fragment of one page
fn process_page(
    page: &ListingPage,
    category: &str,
    subcategory: &str,
    path: &str,
    cursor: u32,
) -> PageOutcome {
    let mut outcome = PageOutcome {
        fragments: page.fragments.len(),
        ..PageOutcome::default()
    };

    for (index, fragment) in page.fragments.iter().enumerate() {
        match extract(fragment) {
            Ok(extraction) if extraction.is_in_stock() => {
                outcome
                    .records
                    .push(extraction.into_record(category, subcategory));
            }
            Ok(extraction) => {
                tracing::trace!(
                    "Dropping '{}' ({:?})",
                    extraction.product.name,
                    extraction.offer.availability
                );
                outcome.out_of_stock += 1;
            }
            Err(e) => {
                let reason = if e.is_malformed() {
                    "incomplete structured data"
                } else {
                    "unreadable offer"
                };
                tracing::warn!(
                    "Skipping product {} on page {} of '{}' ({}): {}",
                    index + 1,
                    cursor,
                    path,
                    reason,
                    e
                );
                outcome.skipped += 1;
            }
        }
    }

    outcome
}
