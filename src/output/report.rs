//! Run report
//!
//! Every subcategory ends in exactly one outcome. The report keeps them in
//! category-tree order so partial failures can be listed at the end of a
//! run, next to what did complete.

use crate::crawler::CrawlStats;
use crate::GondolaError;
use chrono::{DateTime, Utc};

/// How a subcategory crawl ended
#[derive(Debug)]
pub enum SubcategoryStatus {
    /// Pagination reached an empty page and the result was written
    Completed,

    /// The page cap cut pagination short; the partial result was written
    Truncated { max_pages: u32 },

    /// Nothing was written for this subcategory
    Failed(GondolaError),
}

impl SubcategoryStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The outcome of one subcategory
#[derive(Debug)]
pub struct SubcategoryOutcome {
    pub category: String,
    pub subcategory: String,
    pub path: String,
    pub status: SubcategoryStatus,
    pub stats: CrawlStats,
}

/// Outcomes of a whole run
#[derive(Debug)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SubcategoryOutcome>,
}

impl CrawlReport {
    pub fn completed(&self) -> impl Iterator<Item = &SubcategoryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SubcategoryStatus::Completed))
    }

    pub fn truncated(&self) -> impl Iterator<Item = &SubcategoryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SubcategoryStatus::Truncated { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SubcategoryOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Records written across all non-failed subcategories
    pub fn total_records(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|o| !o.status.is_failure())
            .map(|o| o.stats.records_kept)
            .sum()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a human-readable report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!("  Subcategories: {}", report.outcomes.len());
    println!("  Records written: {}", report.total_records());
    println!();

    let completed: Vec<_> = report.completed().collect();
    if !completed.is_empty() {
        println!("Completed ({}):", completed.len());
        for outcome in completed {
            println!(
                "  - {} / {} ({}): {} records, {} pages, {} skipped, {} out of stock",
                outcome.category,
                outcome.subcategory,
                outcome.path,
                outcome.stats.records_kept,
                outcome.stats.pages_fetched,
                outcome.stats.fragments_skipped,
                outcome.stats.out_of_stock
            );
        }
        println!();
    }

    let truncated: Vec<_> = report.truncated().collect();
    if !truncated.is_empty() {
        println!("Truncated at page cap ({}):", truncated.len());
        for outcome in truncated {
            if let SubcategoryStatus::Truncated { max_pages } = outcome.status {
                println!(
                    "  - {} / {} ({}): {} records, stopped after {} pages",
                    outcome.category,
                    outcome.subcategory,
                    outcome.path,
                    outcome.stats.records_kept,
                    max_pages
                );
            }
        }
        println!();
    }

    let failed: Vec<_> = report.failed().collect();
    if !failed.is_empty() {
        println!("Failed ({}):", failed.len());
        for outcome in failed {
            if let SubcategoryStatus::Failed(error) = &outcome.status {
                println!(
                    "  - {} / {} ({}): {}",
                    outcome.category, outcome.subcategory, outcome.path, error
                );
            }
        }
        println!();
    }
}
