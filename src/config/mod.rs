//! Configuration module for Gondola
//!
//! This module loads the TOML settings file and the JSON category tree it
//! points to, and validates both before any crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use gondola::config::load_crawl_plan;
//! use std::path::Path;
//!
//! let (config, categories) = load_crawl_plan(Path::new("gondola.toml")).unwrap();
//! println!("Crawling {} categories, at most {} pages each", categories.len(), config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_categories, load_config, load_crawl_plan, parse_categories};
pub use validation::validate_categories;
