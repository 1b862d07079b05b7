use serde::{Deserialize, Serialize};

/// A top-level product category and its ordered subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name stamped onto every record of this category
    pub name: String,

    /// Subcategories in crawl order
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// A leaf category; one result set is produced per subcategory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Display name stamped onto every record of this subcategory
    pub name: String,

    /// URL segment used to build listing-page URLs and the result file name
    pub path: String,
}

impl Category {
    /// Iterates the subcategories paired with their owning category
    pub fn leaves(&self) -> impl Iterator<Item = (&Category, &Subcategory)> {
        self.subcategories.iter().map(move |sub| (self, sub))
    }
}
