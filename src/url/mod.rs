//! Listing-page URL construction
//!
//! A listing URL is built from a template holding two placeholders:
//! `{category}` for the subcategory path and `{page}` for the 1-based cursor.

use crate::{UrlError, UrlResult};
use url::Url;

/// Placeholder replaced with the subcategory path
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Placeholder replaced with the page number
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// The storefront listing layout the crawler was built for
pub const DEFAULT_LISTING_URL: &str = "https://www.carrefour.com.br/{category}?termo=:&isGrid=true&sort=relevance&page={page}&foodzipzone=na";

/// A validated listing-page URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrlTemplate {
    template: String,
}

impl ListingUrlTemplate {
    /// Validates and wraps a template
    ///
    /// The template must contain both placeholders and must render to an
    /// absolute `http` or `https` URL.
    ///
    /// # Example
    ///
    /// ```
    /// use gondola::url::ListingUrlTemplate;
    ///
    /// let template = ListingUrlTemplate::new("https://shop.example/{category}?page={page}").unwrap();
    /// let url = template.render("mercearia", 2).unwrap();
    /// assert_eq!(url.as_str(), "https://shop.example/mercearia?page=2");
    /// ```
    pub fn new(template: &str) -> UrlResult<Self> {
        for placeholder in [CATEGORY_PLACEHOLDER, PAGE_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(UrlError::Parse(format!(
                    "template '{}' is missing the {} placeholder",
                    template, placeholder
                )));
            }
        }

        let candidate = Self {
            template: template.to_string(),
        };

        let probe = candidate.render("probe", 1)?;
        if probe.scheme() != "http" && probe.scheme() != "https" {
            return Err(UrlError::Parse(format!(
                "template '{}' must use http or https",
                template
            )));
        }

        Ok(candidate)
    }

    /// Renders the listing URL for a subcategory path and page cursor
    pub fn render(&self, path: &str, page: u32) -> UrlResult<Url> {
        validate_path(path)?;

        let raw = self
            .template
            .replace(CATEGORY_PLACEHOLDER, path)
            .replace(PAGE_PLACEHOLDER, &page.to_string());

        Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for ListingUrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_LISTING_URL.to_string(),
        }
    }
}

/// Checks that a subcategory path is non-empty and URL-safe
///
/// Allowed characters are ASCII alphanumerics, `-`, `_`, `.` and `/`.
/// Segments may not be empty, `.` or `..`, since the path also names the
/// result file on disk.
pub fn validate_path(path: &str) -> UrlResult<()> {
    if path.is_empty() {
        return Err(UrlError::InvalidPath("path cannot be empty".to_string()));
    }

    if let Some(c) = path
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
    {
        return Err(UrlError::InvalidPath(format!(
            "'{}' contains invalid character '{}'",
            path, c
        )));
    }

    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(UrlError::InvalidPath(format!(
            "'{}' contains an empty or relative segment",
            path
        )));
    }

    Ok(())
}
