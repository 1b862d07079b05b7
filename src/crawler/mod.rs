//! Crawler module for listing-page pagination
//!
//! This module contains the core crawling logic, including:
//! - Listing page fetching behind the `ListingFetcher` seam
//! - The per-subcategory pagination state machine
//! - Pagination with bounded retries and a page cap
//! - Category tree orchestration over a bounded worker pool

mod fetcher;
mod orchestrator;
mod pagination;
mod state;

pub use fetcher::{
    build_http_client, product_fragments, HttpListingFetcher, ListingFetcher, ListingPage,
    PRODUCT_SELECTOR,
};
pub use orchestrator::{run_crawl, Orchestrator};
pub use pagination::{Paginator, SubcategoryCrawl};
pub use state::{CrawlStats, PageOutcome, PaginationPhase, PaginationState};
