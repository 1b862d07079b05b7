use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ExtractionError;

/// The serialized markup of one rendered product entry
///
/// Fragments live only for the duration of one page fetch and are read, never
/// mutated, by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFragment {
    markup: String,
}

impl ProductFragment {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// The fragment's outer HTML
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Product properties decoded from a schema.org Product block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    pub name: String,

    /// `None` when the block has no image or an empty one
    pub image: Option<String>,
}

/// Offer properties decoded from a schema.org Offer block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOffer {
    pub price: Price,
    pub availability: Availability,
}

/// schema.org ItemAvailability values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    InStock,
    OutOfStock,
    PreOrder,
    Discontinued,
    LimitedAvailability,
    /// Any other token, kept verbatim
    Other(String),
}

impl Availability {
    /// Parses either the short token (`InStock`) or the full schema.org IRI
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let token = value
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(value);

        match token {
            "InStock" => Self::InStock,
            "OutOfStock" => Self::OutOfStock,
            "PreOrder" => Self::PreOrder,
            "Discontinued" => Self::Discontinued,
            "LimitedAvailability" => Self::LimitedAvailability,
            _ => Self::Other(token.to_string()),
        }
    }

    pub fn is_in_stock(&self) -> bool {
        matches!(self, Self::InStock)
    }
}

/// A decimal price kept as the text the page published
///
/// Only validated, never converted, so no precision is lost on the way to
/// the result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price(String);

impl Price {
    /// Accepts digits with `.` and `,` as decimal or grouping separators
    ///
    /// Both "1.299,90" and "1,299.90" are valid. The value must start with a
    /// digit; currency symbols and other text are rejected.
    pub fn parse(value: &str) -> Result<Self, ExtractionError> {
        let value = value.trim();

        let numeric = value.starts_with(|c: char| c.is_ascii_digit())
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == ',');

        if !numeric {
            return Err(ExtractionError::InvalidPrice(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}", self.0)
    }
}

/// One persisted in-stock product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub category: String,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    pub name: String,
    pub image: String,
    pub weight: String,
    pub quantity: String,
    /// Formatted as `R$ <price>`
    pub price: String,
}

/// All in-stock records collected for one subcategory, in page order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub products: Vec<ProductRecord>,
}

impl CrawlResult {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
