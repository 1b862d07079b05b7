use crate::catalog::Category;
use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::validate_path;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.categories_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "categories_path cannot be empty".to_string(),
        ));
    }

    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    config.listing_template()?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_concurrent_sessions < 1 || config.max_concurrent_sessions > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_sessions must be between 1 and 32, got {}",
            config.max_concurrent_sessions
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a category tree
///
/// Names must be non-empty, every path must be URL-safe, and no two
/// subcategories may share a path since the path names the result file.
pub fn validate_categories(categories: &[Category]) -> Result<(), ConfigError> {
    let mut seen_paths = HashSet::new();

    for category in categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }

        for subcategory in &category.subcategories {
            if subcategory.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "subcategory of '{}' has an empty name",
                    category.name
                )));
            }

            validate_path(&subcategory.path).map_err(|e| {
                ConfigError::Validation(format!(
                    "subcategory '{}' of '{}': {}",
                    subcategory.name, category.name, e
                ))
            })?;

            if !seen_paths.insert(subcategory.path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "subcategory path '{}' is used more than once",
                    subcategory.path
                )));
            }
        }
    }

    Ok(())
}
