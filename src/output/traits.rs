//! Result sink trait
//!
//! A sink receives each subcategory's finished `CrawlResult`, keyed by the
//! subcategory path. Sinks are shared across concurrent subcategory crawls.

use crate::catalog::CrawlResult;
use crate::SinkError;
use async_trait::async_trait;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for finished subcategory results
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persists the result for the subcategory at `path`
    async fn write(&self, path: &str, result: &CrawlResult) -> SinkResult<()>;
}
