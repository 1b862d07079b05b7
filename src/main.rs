//! Gondola main entry point
//!
//! This is the command-line interface for the Gondola catalog crawler.

use anyhow::{bail, Context};
use clap::Parser;
use gondola::catalog::Category;
use gondola::config::{load_crawl_plan, Config};
use gondola::output::print_report;
use gondola::Orchestrator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gondola: a paginated product-catalog crawler
///
/// Gondola walks every subcategory of a category tree, paginates through
/// its listing pages and writes the in-stock products it finds to one JSON
/// file per subcategory.
#[derive(Parser, Debug)]
#[command(name = "gondola")]
#[command(version)]
#[command(about = "A paginated product-catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, categories) = load_crawl_plan(&cli.config)
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;

    if cli.dry_run {
        return handle_dry_run(&config, &categories);
    }

    handle_crawl(&config, &categories).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gondola=info,warn"),
            1 => EnvFilter::new("gondola=debug,info"),
            2 => EnvFilter::new("gondola=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, categories: &[Category]) -> anyhow::Result<()> {
    let template = config.crawler.listing_template()?;

    println!("=== Gondola Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Listing URL: {}", template.as_str());
    println!("  Max pages per subcategory: {}", config.crawler.max_pages);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Retry delay: {}ms", config.crawler.retry_delay_ms);
    println!(
        "  Max concurrent sessions: {}",
        config.crawler.max_concurrent_sessions
    );
    println!("  User agent: {}", config.user_agent.header_value());
    println!("  Output directory: {}", config.output.directory.display());

    println!("\nCategories ({}):", categories.len());
    for category in categories {
        println!("  - {} ({} subcategories)", category.name, category.subcategories.len());
        for subcategory in &category.subcategories {
            let url = template.render(&subcategory.path, 1)?;
            println!("    * {} -> {}", subcategory.name, url);
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, categories: &[Category]) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let report = orchestrator.run_until(categories, shutdown).await;
    print_report(&report);

    let failed = report.failed().count();
    if failed > 0 {
        tracing::error!("{} of {} subcategories failed", failed, report.outcomes.len());
        bail!("{} subcategories failed", failed);
    }

    tracing::info!(
        "Crawl completed: {} records in {}s",
        report.total_records(),
        report.duration_seconds()
    );
    Ok(())
}
