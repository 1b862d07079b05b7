//! Crawl orchestrator - walks the category tree
//!
//! Every subcategory becomes one task in a bounded worker pool. A task
//! paginates its subcategory, hands the frozen result to the sink and
//! reports an outcome. A failure ends only its own task; sibling
//! subcategories keep going.

use crate::catalog::{Category, Subcategory};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{HttpListingFetcher, ListingFetcher};
use crate::crawler::pagination::Paginator;
use crate::crawler::state::{CrawlStats, PaginationPhase};
use crate::output::{CrawlReport, JsonFileSink, ResultSink, SubcategoryOutcome, SubcategoryStatus};
use crate::GondolaError;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One subcategory scheduled for crawling, in tree order
#[derive(Debug, Clone)]
struct PlannedCrawl {
    index: usize,
    category: String,
    subcategory: Subcategory,
}

/// Main crawl orchestrator structure
pub struct Orchestrator<F, S> {
    fetcher: Arc<F>,
    sink: Arc<S>,
    settings: CrawlerConfig,
    sessions: Arc<Semaphore>,
}

impl Orchestrator<HttpListingFetcher, JsonFileSink> {
    /// Creates an orchestrator that fetches over HTTP and writes JSON files
    pub fn from_config(config: &Config) -> Result<Self, GondolaError> {
        let fetcher = HttpListingFetcher::from_config(config)?;
        let sink = JsonFileSink::new(&config.output.directory);
        Ok(Self::new(fetcher, sink, config.crawler.clone()))
    }
}

impl<F, S> Orchestrator<F, S>
where
    F: ListingFetcher + 'static,
    S: ResultSink + 'static,
{
    pub fn new(fetcher: F, sink: S, settings: CrawlerConfig) -> Self {
        let sessions = Arc::new(Semaphore::new(settings.max_concurrent_sessions as usize));

        Self {
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
            settings,
            sessions,
        }
    }

    /// Crawls every subcategory of every category
    pub async fn run(&self, categories: &[Category]) -> CrawlReport {
        self.run_until(categories, std::future::pending::<()>()).await
    }

    /// Crawls every subcategory until done or until `shutdown` resolves
    ///
    /// On shutdown, running tasks are aborted and every subcategory that did
    /// not finish is reported as failed.
    pub async fn run_until(
        &self,
        categories: &[Category],
        shutdown: impl Future<Output = ()>,
    ) -> CrawlReport {
        let started_at = Utc::now();
        let plan = plan(categories);
        let workers = self.settings.max_concurrent_sessions.max(1) as usize;

        tracing::info!(
            "Starting crawl of {} subcategories across {} categories ({} workers)",
            plan.len(),
            categories.len(),
            workers
        );

        let mut outcomes: Vec<Option<SubcategoryOutcome>> = plan.iter().map(|_| None).collect();
        let mut pending = plan.iter().cloned();
        let mut tasks = JoinSet::new();

        tokio::pin!(shutdown);

        loop {
            while tasks.len() < workers {
                let Some(planned) = pending.next() else {
                    break;
                };
                tasks.spawn(self.crawl_task(planned));
            }

            if tasks.is_empty() {
                break;
            }

            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok((index, outcome))) => outcomes[index] = Some(outcome),
                    Some(Err(e)) => tracing::error!("Crawl task ended abnormally: {}", e),
                    None => break,
                },
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, aborting {} running crawls", tasks.len());
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    break;
                }
            }
        }

        let outcomes = plan
            .into_iter()
            .zip(outcomes)
            .map(|(planned, outcome)| {
                outcome.unwrap_or_else(|| SubcategoryOutcome {
                    status: SubcategoryStatus::Failed(GondolaError::Task {
                        path: planned.subcategory.path.clone(),
                        message: "crawl did not finish".to_string(),
                    }),
                    category: planned.category,
                    subcategory: planned.subcategory.name,
                    path: planned.subcategory.path,
                    stats: CrawlStats::default(),
                })
            })
            .collect();

        CrawlReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }

    /// Builds the future crawling and sinking one subcategory
    fn crawl_task(
        &self,
        planned: PlannedCrawl,
    ) -> impl Future<Output = (usize, SubcategoryOutcome)> + Send + 'static {
        let paginator =
            Paginator::with_sessions(self.fetcher.clone(), self.sessions.clone(), &self.settings);
        let sink = self.sink.clone();
        let max_pages = self.settings.max_pages;

        async move {
            let PlannedCrawl {
                index,
                category,
                subcategory,
            } = planned;

            let (status, stats) = match paginator.crawl(&category, &subcategory).await {
                Ok(crawl) => {
                    let status = match sink.write(&subcategory.path, &crawl.result).await {
                        Err(e) => {
                            tracing::error!("Failed to store '{}': {}", subcategory.path, e);
                            SubcategoryStatus::Failed(e.into())
                        }
                        Ok(()) if crawl.termination == PaginationPhase::CapReached => {
                            let error = GondolaError::PageCapExceeded {
                                path: subcategory.path.clone(),
                                max_pages,
                            };
                            tracing::warn!("{}; partial result stored", error);
                            SubcategoryStatus::Truncated { max_pages }
                        }
                        Ok(()) => SubcategoryStatus::Completed,
                    };
                    (status, crawl.stats)
                }
                Err(e) => {
                    tracing::error!("Crawl of '{}' failed: {}", subcategory.path, e);
                    (SubcategoryStatus::Failed(e), CrawlStats::default())
                }
            };

            let outcome = SubcategoryOutcome {
                category,
                subcategory: subcategory.name,
                path: subcategory.path,
                status,
                stats,
            };
            (index, outcome)
        }
    }
}

/// Flattens the category tree into crawl order
fn plan(categories: &[Category]) -> Vec<PlannedCrawl> {
    categories
        .iter()
        .flat_map(Category::leaves)
        .enumerate()
        .map(|(index, (category, subcategory))| PlannedCrawl {
            index,
            category: category.name.clone(),
            subcategory: subcategory.clone(),
        })
        .collect()
}

/// Runs a complete crawl from a loaded configuration
///
/// # Example
///
/// ```no_run
/// use gondola::config::load_crawl_plan;
/// use gondola::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, categories) = load_crawl_plan(Path::new("gondola.toml"))?;
/// let report = run_crawl(&config, &categories).await?;
/// println!("{} records written", report.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, categories: &[Category]) -> Result<CrawlReport, GondolaError> {
    let orchestrator = Orchestrator::from_config(config)?;
    Ok(orchestrator.run(categories).await)
}
