//! HTML microdata decoding
//!
//! Turns serialized markup into a flat list of typed schema blocks, one per
//! `itemscope` element, in document order. Nested items become blocks of
//! their own and are referenced from the parent by index, so a Product with
//! an embedded Offer yields `[Product, Offer]`.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SCOPE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[itemscope], [itemtype]").expect("scope selector is valid")
});

static PROPERTY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop]").expect("property selector is valid"));

/// The value of one microdata property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    /// A nested item, as an index into the parsed block list
    Item(usize),
}

/// One microdata item: its type and its properties in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlock {
    /// The first `itemtype` token, e.g. `https://schema.org/Product`
    pub item_type: Option<String>,

    pub properties: Vec<(String, PropertyValue)>,
}

impl SchemaBlock {
    /// Returns true if the item type is the given schema.org type
    ///
    /// Matches on the last path segment so both `http://` and `https://`
    /// vocabularies are accepted.
    pub fn is_type(&self, name: &str) -> bool {
        self.item_type
            .as_deref()
            .and_then(|t| t.trim_end_matches('/').rsplit('/').next())
            .is_some_and(|t| t == name)
    }

    /// Returns the first text value of a property
    pub fn text(&self, property: &str) -> Option<&str> {
        self.properties.iter().find_map(|(name, value)| match value {
            PropertyValue::Text(text) if name == property => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Parses every microdata item found in the markup
pub fn parse_structured_data(markup: &str) -> Vec<SchemaBlock> {
    let document = Html::parse_fragment(markup);

    let scopes: Vec<ElementRef> = document.select(&SCOPE_SELECTOR).collect();
    let mut blocks: Vec<SchemaBlock> = scopes
        .iter()
        .map(|scope| SchemaBlock {
            item_type: scope
                .value()
                .attr("itemtype")
                .and_then(|t| t.split_whitespace().next())
                .map(str::to_string),
            properties: Vec::new(),
        })
        .collect();

    for element in document.select(&PROPERTY_SELECTOR) {
        let Some(owner) = owning_scope(&element, &scopes) else {
            continue;
        };

        let value = match scopes.iter().position(|s| s.id() == element.id()) {
            Some(nested) => PropertyValue::Item(nested),
            None => PropertyValue::Text(property_text(&element)),
        };

        let names = element.value().attr("itemprop").unwrap_or_default();
        for name in names.split_whitespace() {
            blocks[owner]
                .properties
                .push((name.to_string(), value.clone()));
        }
    }

    blocks
}

/// Finds the index of the nearest enclosing item scope
fn owning_scope(element: &ElementRef, scopes: &[ElementRef]) -> Option<usize> {
    element
        .ancestors()
        .find_map(|node| scopes.iter().position(|s| s.id() == node.id()))
}

/// Reads a property value following the microdata attribute rules
fn property_text(element: &ElementRef) -> String {
    let el = element.value();

    if let Some(content) = el.attr("content") {
        return content.trim().to_string();
    }

    let attr = match el.name() {
        "img" | "audio" | "video" | "source" | "iframe" | "embed" | "track" => el.attr("src"),
        "a" | "link" | "area" => el.attr("href"),
        "object" => el.attr("data"),
        "data" | "meter" => el.attr("value"),
        "time" => el.attr("datetime"),
        _ => None,
    };

    match attr {
        Some(value) => value.trim().to_string(),
        None => element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" "),
    }
}
