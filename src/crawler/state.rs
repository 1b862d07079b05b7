//! Per-subcategory pagination state
//!
//! Pagination is an explicit state machine: the cursor and the accumulated
//! records advance only when a page is recorded, and the machine becomes
//! terminal when a page comes back empty, the page cap is reached, or a
//! page fails for good.

use crate::catalog::{CrawlResult, ProductRecord};
use std::fmt;

/// Where a subcategory crawl stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationPhase {
    /// More pages may follow
    Fetching,

    /// An empty page was seen; the catalog is exhausted
    Exhausted,

    /// The page cap was hit before an empty page was seen
    CapReached,

    /// A page failed after all retries
    Failed,
}

impl PaginationPhase {
    /// Returns true if no further page will be fetched
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fetching)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Exhausted => "exhausted",
            Self::CapReached => "cap_reached",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaginationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counters collected while crawling one subcategory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully, including the final empty page
    pub pages_fetched: u32,

    /// Product fragments found across all pages
    pub fragments_seen: u64,

    /// Records kept (in stock and well-formed)
    pub records_kept: u64,

    /// Fragments dropped because their structured data could not be decoded
    pub fragments_skipped: u64,

    /// Well-formed offers dropped for not being in stock
    pub out_of_stock: u64,

    /// Page fetches repeated after a transient failure
    pub retries: u32,
}

/// What one processed page contributed
#[derive(Debug, Clone, Default)]
pub struct PageOutcome {
    pub fragments: usize,
    pub records: Vec<ProductRecord>,
    pub skipped: u64,
    pub out_of_stock: u64,
}

/// The cursor and accumulator for one subcategory
#[derive(Debug)]
pub struct PaginationState {
    cursor: u32,
    max_pages: u32,
    phase: PaginationPhase,
    result: CrawlResult,
    stats: CrawlStats,
}

impl PaginationState {
    /// Starts at page 1 with an empty accumulator
    pub fn new(max_pages: u32) -> Self {
        Self {
            cursor: 1,
            max_pages,
            phase: PaginationPhase::Fetching,
            result: CrawlResult::default(),
            stats: CrawlStats::default(),
        }
    }

    /// The page to fetch next, or `None` once terminal
    pub fn next_cursor(&self) -> Option<u32> {
        (!self.phase.is_terminal()).then_some(self.cursor)
    }

    pub fn phase(&self) -> PaginationPhase {
        self.phase
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn record_retry(&mut self) {
        self.stats.retries += 1;
    }

    /// Returns true when the next page is the one past `max_pages`
    ///
    /// That page is fetched only to tell a catalog of exactly `max_pages`
    /// pages from a longer one. Its records are never kept.
    pub fn past_cap(&self) -> bool {
        self.cursor > self.max_pages
    }

    /// Applies a fetched page
    ///
    /// An empty page is terminal. Otherwise the records are appended and the
    /// cursor advances. A non-empty page past `max_pages` ends the crawl as
    /// `CapReached` without adding its records.
    pub fn record_page(&mut self, page: PageOutcome) -> PaginationPhase {
        if self.phase.is_terminal() {
            return self.phase;
        }

        self.stats.pages_fetched += 1;

        if page.fragments == 0 {
            self.phase = PaginationPhase::Exhausted;
            return self.phase;
        }

        if self.past_cap() {
            self.phase = PaginationPhase::CapReached;
            return self.phase;
        }

        self.stats.fragments_seen += page.fragments as u64;
        self.stats.records_kept += page.records.len() as u64;
        self.stats.fragments_skipped += page.skipped;
        self.stats.out_of_stock += page.out_of_stock;
        self.result.products.extend(page.records);

        self.cursor += 1;
        self.phase
    }

    /// Marks the current page as failed for good
    pub fn record_failure(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = PaginationPhase::Failed;
        }
    }

    /// Freezes the accumulated records
    pub fn finish(self) -> (CrawlResult, CrawlStats, PaginationPhase) {
        (self.result, self.stats, self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            category: "Mercearia".to_string(),
            subcategory: "Arroz".to_string(),
            name: name.to_string(),
            image: String::new(),
            weight: String::new(),
            quantity: String::new(),
            price: "R$ 1.00".to_string(),
        }
    }

    fn page(names: &[&str], skipped: u64, out_of_stock: u64) -> PageOutcome {
        PageOutcome {
            fragments: names.len() + (skipped + out_of_stock) as usize,
            records: names.iter().map(|n| record(n)).collect(),
            skipped,
            out_of_stock,
        }
    }

    #[test]
    fn test_starts_at_page_one() {
        let state = PaginationState::new(10);
        assert_eq!(state.next_cursor(), Some(1));
        assert_eq!(state.phase(), PaginationPhase::Fetching);
    }

    #[test]
    fn test_cursor_advances_and_accumulates_in_order() {
        let mut state = PaginationState::new(10);

        state.record_page(page(&["a", "b"], 0, 1));
        assert_eq!(state.next_cursor(), Some(2));
        state.record_page(page(&["c"], 1, 0));
        assert_eq!(state.next_cursor(), Some(3));

        let phase = state.record_page(PageOutcome::default());
        assert_eq!(phase, PaginationPhase::Exhausted);
        assert_eq!(state.next_cursor(), None);

        let (result, stats, phase) = state.finish();
        let names: Vec<_> = result.products.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(phase, PaginationPhase::Exhausted);
        assert_eq!(stats.pages_fetched, 3);
        assert_eq!(stats.fragments_seen, 5);
        assert_eq!(stats.records_kept, 3);
        assert_eq!(stats.fragments_skipped, 1);
        assert_eq!(stats.out_of_stock, 1);
    }

    #[test]
    fn test_page_with_only_filtered_fragments_is_not_empty() {
        let mut state = PaginationState::new(10);
        let phase = state.record_page(page(&[], 0, 3));

        assert_eq!(phase, PaginationPhase::Fetching);
        assert_eq!(state.next_cursor(), Some(2));
    }

    #[test]
    fn test_cap_reached() {
        let mut state = PaginationState::new(2);

        assert_eq!(state.record_page(page(&["a"], 0, 0)), PaginationPhase::Fetching);
        assert_eq!(state.record_page(page(&["b"], 0, 0)), PaginationPhase::Fetching);
        assert!(state.past_cap());
        assert_eq!(state.next_cursor(), Some(3));
        assert_eq!(state.record_page(page(&["c"], 0, 0)), PaginationPhase::CapReached);
        assert_eq!(state.next_cursor(), None);

        let (result, stats, phase) = state.finish();
        let names: Vec<_> = result.products.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(stats.pages_fetched, 3);
        assert_eq!(stats.records_kept, 2);
        assert_eq!(phase, PaginationPhase::CapReached);
    }

    #[test]
    fn test_catalog_of_exactly_max_pages_is_exhausted() {
        let mut state = PaginationState::new(2);

        state.record_page(page(&["a"], 0, 0));
        state.record_page(page(&["b"], 0, 0));
        assert_eq!(
            state.record_page(PageOutcome::default()),
            PaginationPhase::Exhausted
        );

        let (result, _, phase) = state.finish();
        assert_eq!(result.len(), 2);
        assert_eq!(phase, PaginationPhase::Exhausted);
    }

    #[test]
    fn test_terminal_state_ignores_further_pages() {
        let mut state = PaginationState::new(10);
        state.record_failure();

        assert_eq!(state.record_page(page(&["a"], 0, 0)), PaginationPhase::Failed);
        assert_eq!(state.stats().pages_fetched, 0);

        state.record_failure();
        assert_eq!(state.phase(), PaginationPhase::Failed);
    }

    #[test]
    fn test_phase_strings() {
        assert_eq!(PaginationPhase::CapReached.to_string(), "cap_reached");
        assert!(PaginationPhase::Exhausted.is_terminal());
        assert!(!PaginationPhase::Fetching.is_terminal());
    }
}
