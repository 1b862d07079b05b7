//! Data contracts shared between the crawl stages
//!
//! - `Category` / `Subcategory`: the immutable category tree loaded at startup
//! - `ProductFragment`: the serialized markup of one product entry on a listing page
//! - `RawProduct` / `RawOffer`: the typed structured data decoded from a fragment
//! - `ProductRecord` / `CrawlResult`: the persisted output for one subcategory

mod category;
mod record;

pub use category::{Category, Subcategory};
pub use record::{
    Availability, CrawlResult, Price, ProductFragment, ProductRecord, RawOffer, RawProduct,
};
