//! Field normalization for product records
//!
//! These functions derive secondary attributes from free text. They are
//! total: when nothing matches they return an empty string, never an error.
//! Matches are returned verbatim, so values are not comparable as numbers
//! across records ("1kg" and "1000 g" stay different strings).

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Digits, optional `,` decimal part, optional space, then a weight/volume unit
///
/// Units are tried in this order and need no trailing boundary, so "500gr"
/// yields "500g" and "100 gramas" yields "100 g".
static WEIGHT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(,\d+)? ?(g|ml|kg|litros?|l|kilos?|gramas?)")
        .expect("weight pattern is valid")
});

/// Digits, optional space, then `unidade` or `unidades`
static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+ ?unidades?").expect("quantity pattern is valid")
});

static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("image selector is valid"));

/// Returns the first weight or volume mentioned in a product name
///
/// # Examples
///
/// ```
/// use gondola::extract::extract_weight;
///
/// assert_eq!(extract_weight("Arroz Branco Tipo 1 5kg"), "5kg");
/// assert_eq!(extract_weight("Refrigerante Pack 6 unidades"), "");
/// ```
pub fn extract_weight(name: &str) -> String {
    first_match(&WEIGHT_PATTERN, name)
}

/// Returns the first unit count mentioned in a product name
///
/// # Examples
///
/// ```
/// use gondola::extract::extract_quantity;
///
/// assert_eq!(extract_quantity("Refrigerante Pack 6 unidades"), "6 unidades");
/// assert_eq!(extract_quantity("Arroz Branco Tipo 1 5kg"), "");
/// ```
pub fn extract_quantity(name: &str) -> String {
    first_match(&QUANTITY_PATTERN, name)
}

fn first_match(pattern: &Regex, text: &str) -> String {
    pattern
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Returns the image URL of the first `<img>` in the markup
///
/// Lazy-loaded listings ship an empty `src` placeholder and the real URL in
/// `data-src`, so `src` only wins when it is non-empty.
pub fn extract_fallback_image(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);

    let Some(img) = fragment.select(&IMAGE_SELECTOR).next() else {
        return String::new();
    };

    ["src", "data-src"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Resolves a product image from structured data, falling back to the markup
pub fn resolve_image(structured: Option<&str>, markup: &str) -> String {
    match structured.map(str::trim) {
        Some(image) if !image.is_empty() => image.to_string(),
        _ => extract_fallback_image(markup),
    }
}
