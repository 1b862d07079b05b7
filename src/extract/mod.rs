//! Structured-data extraction for product listings
//!
//! This module turns one product fragment into a typed record:
//! - `microdata`: decodes schema.org microdata blocks from raw markup
//! - `extractor`: picks the Product and Offer blocks and validates them
//! - `normalize`: derives weight, quantity and fallback image from free text

mod extractor;
mod microdata;
mod normalize;

pub use extractor::{extract, extract_markup, Extraction};
pub use microdata::{parse_structured_data, PropertyValue, SchemaBlock};
pub use normalize::{extract_fallback_image, extract_quantity, extract_weight, resolve_image};
