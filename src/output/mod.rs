//! Output module for crawl results and run reports
//!
//! This module handles:
//! - Persisting one JSON result file per subcategory
//! - Collecting per-subcategory outcomes into a run report
//! - Printing the report at the end of a run

mod json_sink;
pub mod report;
mod traits;

pub use json_sink::JsonFileSink;
pub use report::{print_report, CrawlReport, SubcategoryOutcome, SubcategoryStatus};
pub use traits::{ResultSink, SinkResult};
