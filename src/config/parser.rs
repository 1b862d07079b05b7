use crate::catalog::Category;
use crate::config::types::Config;
use crate::config::validation::{validate, validate_categories};
use crate::ConfigError;
use serde_json::Value;
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads and validates a JSON category tree
pub fn load_categories(path: &Path) -> Result<Vec<Category>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let categories = parse_categories(&content)?;
    validate_categories(&categories)?;
    Ok(categories)
}

/// Parses a category document
///
/// The document is either an array of categories or an object mapping an
/// arbitrary key to each category. Document order is kept in both cases.
///
/// # Example
///
/// ```
/// use gondola::config::parse_categories;
///
/// let json = r#"{"bebidas": {"name": "Bebidas", "subcategories": [{"name": "Sucos", "path": "bebidas/sucos"}]}}"#;
/// let categories = parse_categories(json).unwrap();
/// assert_eq!(categories[0].subcategories[0].path, "bebidas/sucos");
/// ```
pub fn parse_categories(content: &str) -> Result<Vec<Category>, ConfigError> {
    let document: Value = serde_json::from_str(content)?;

    match document {
        Value::Array(_) => Ok(serde_json::from_value(document)?),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(_, category)| serde_json::from_value(category).map_err(ConfigError::from))
            .collect(),
        _ => Err(ConfigError::Validation(
            "category document must be an array or an object".to_string(),
        )),
    }
}

/// Loads the settings file and the category tree it references
///
/// A relative `categories-path` is resolved against the directory holding
/// the settings file.
pub fn load_crawl_plan(path: &Path) -> Result<(Config, Vec<Category>), ConfigError> {
    let config = load_config(path)?;

    let categories_path = match path.parent() {
        Some(dir) if config.categories_path.is_relative() => dir.join(&config.categories_path),
        _ => config.categories_path.clone(),
    };

    let categories = load_categories(&categories_path)?;
    Ok((config, categories))
}
