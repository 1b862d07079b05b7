use crate::catalog::{Availability, Price, ProductFragment, ProductRecord, RawOffer, RawProduct};
use crate::extract::microdata::{parse_structured_data, SchemaBlock};
use crate::extract::normalize::{extract_quantity, extract_weight, resolve_image};
use crate::ExtractionError;

/// The decoded Product/Offer pair of one fragment, with the markup it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub product: RawProduct,
    pub offer: RawOffer,
    /// Kept for fallback lookups when the Product block omits a field
    pub markup: String,
}

impl Extraction {
    pub fn is_in_stock(&self) -> bool {
        self.offer.availability.is_in_stock()
    }

    /// Builds the persisted record, stamping the owning category names
    ///
    /// Availability is not checked here; callers filter on `is_in_stock`.
    pub fn into_record(self, category: &str, subcategory: &str) -> ProductRecord {
        let image = resolve_image(self.product.image.as_deref(), &self.markup);

        ProductRecord {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            weight: extract_weight(&self.product.name),
            quantity: extract_quantity(&self.product.name),
            price: self.offer.price.to_string(),
            name: self.product.name,
            image,
        }
    }
}

/// Decodes the Product and Offer microdata of one product fragment
///
/// The fragment must carry at least two item blocks: a schema.org Product
/// followed by an Offer. The first block of each type wins.
///
/// # Errors
///
/// * `MalformedMarkup` - fewer than two blocks, or no Product/Offer block
/// * `MissingProperty` - a refinement of `MalformedMarkup` naming the
///   absent property: Product without `name`, Offer without `price` or
///   `availability`. [`ExtractionError::is_malformed`] covers both.
/// * `InvalidPrice` - the offer price is not numeric
pub fn extract(fragment: &ProductFragment) -> Result<Extraction, ExtractionError> {
    extract_markup(fragment.markup())
}

/// Same as [`extract`], for markup that is not wrapped in a fragment
pub fn extract_markup(markup: &str) -> Result<Extraction, ExtractionError> {
    let blocks = parse_structured_data(markup);

    if blocks.len() < 2 {
        return Err(ExtractionError::MalformedMarkup(format!(
            "expected Product and Offer blocks, found {} block(s)",
            blocks.len()
        )));
    }

    let product_block = find_block(&blocks, "Product")?;
    let offer_block = find_block(&blocks, "Offer")?;

    let name = required(product_block, "Product", "name")?;
    let product = RawProduct {
        name: name.to_string(),
        image: product_block
            .text("image")
            .filter(|image| !image.is_empty())
            .map(str::to_string),
    };

    let offer = RawOffer {
        price: Price::parse(required(offer_block, "Offer", "price")?)?,
        availability: Availability::parse(required(offer_block, "Offer", "availability")?),
    };

    Ok(Extraction {
        product,
        offer,
        markup: markup.to_string(),
    })
}

fn find_block<'a>(
    blocks: &'a [SchemaBlock],
    schema: &'static str,
) -> Result<&'a SchemaBlock, ExtractionError> {
    blocks
        .iter()
        .find(|block| block.is_type(schema))
        .ok_or_else(|| ExtractionError::MalformedMarkup(format!("no {} block", schema)))
}

fn required<'a>(
    block: &'a SchemaBlock,
    schema: &'static str,
    property: &'static str,
) -> Result<&'a str, ExtractionError> {
    block
        .text(property)
        .filter(|value| !value.is_empty())
        .ok_or(ExtractionError::MissingProperty { schema, property })
}
