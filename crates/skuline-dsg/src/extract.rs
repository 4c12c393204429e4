//! Variant extraction from a product document.
//!
//! SKU-to-color matching is by the defining attribute *named* `Color`; the
//! upstream feed usually emits it first, but attribute order is not part of
//! its contract.

use crate::model::{Product, Sku};
use crate::record::ProductCodes;

const COLOR_ATTR: &str = "Color";
const WIDTH_ATTR: &str = "Shoe Width";
const SIZE_ATTRS: [&str; 2] = ["Shoe Size", "Size"];

/// Why a document could not produce variant rows. Skips the product with a
/// logged, counted outcome; never aborts the run.
#[derive(Debug)]
pub enum MalformedProduct {
    NoProductData,
    NoColors,
    NoMatchingSku { color: String },
    NoListPrice { color: String },
}

impl std::fmt::Display for MalformedProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoProductData => write!(f, "document carries no product data"),
            Self::NoColors => write!(f, "no Color defining attribute on any SKU"),
            Self::NoMatchingSku { color } => write!(f, "no SKU matches color '{color}'"),
            Self::NoListPrice { color } => write!(f, "no parsable list price for color '{color}'"),
        }
    }
}

impl std::error::Error for MalformedProduct {}

/// Distinct color values across the SKU set, first-seen order.
pub fn colors(product: &Product) -> Vec<String> {
    let mut out = Vec::new();
    for sku in &product.skus {
        for attr in &sku.defining_attributes {
            if attr.name == COLOR_ATTR && !out.contains(&attr.value) {
                out.push(attr.value.clone());
            }
        }
    }
    out
}

fn sku_color(sku: &Sku) -> Option<&str> {
    sku.defining_attributes
        .iter()
        .find(|a| a.name == COLOR_ATTR)
        .map(|a| a.value.as_str())
}

/// Price/size/width facts for one color, collected across its SKUs.
#[derive(Debug, Default)]
pub struct ColorFacts {
    list_prices: Vec<f64>,
    offer_prices: Vec<f64>,
    sizes: Vec<String>,
    widths: Vec<String>,
}

/// Scan every SKU of `color` and collect its facts.
pub fn color_facts(product: &Product, color: &str) -> ColorFacts {
    let mut facts = ColorFacts::default();
    for sku in product.skus.iter().filter(|s| sku_color(s) == Some(color)) {
        if let Some(price) = sku.prices.list_price {
            facts.list_prices.push(price);
        }
        if let Some(price) = sku.prices.offer_price {
            facts.offer_prices.push(price);
        }
        for attr in &sku.defining_attributes {
            if attr.name == WIDTH_ATTR {
                push_unique(&mut facts.widths, attr.value.clone());
            } else if SIZE_ATTRS.contains(&attr.name.as_str()) {
                // Embedded spaces would break the space-joined set downstream
                push_unique(&mut facts.sizes, attr.value.replace(' ', "_"));
            }
        }
    }
    facts
}

impl ColorFacts {
    /// Minimum list price across the color's SKUs.
    pub fn price(&self) -> Option<f64> {
        min(&self.list_prices)
    }

    /// Minimum offer price, reported only when strictly below the list price.
    pub fn sale_price(&self, list_price: f64) -> Option<f64> {
        min(&self.offer_prices).filter(|&p| p < list_price)
    }

    pub fn joined_sizes(&self) -> String {
        self.sizes.join(" ")
    }

    pub fn joined_widths(&self) -> String {
        self.widths.join(" ")
    }
}

/// Style-level descriptive fields, read once per document.
#[derive(Debug, Clone, Default)]
pub struct ProductInfo {
    pub name: String,
    pub brand: String,
    pub gender: String,
}

pub fn product_info(product: &Product) -> ProductInfo {
    let mut info = ProductInfo {
        name: product.style.name.clone(),
        ..Default::default()
    };
    for attr in &product.style.descriptive_attributes {
        match attr.name.as_str() {
            "Brand" => info.brand = attr.value.clone(),
            "Gender" => info.gender = attr.value.clone(),
            _ => {}
        }
    }
    info
}

/// Identifiers from the first SKU matching the color. `sku` doubles the
/// parent part number, which keys the image manifest as well.
pub fn product_codes(product: &Product, color: &str) -> Option<ProductCodes> {
    let sku = product.skus.iter().find(|s| sku_color(s) == Some(color))?;
    Some(ProductCodes {
        part_number: sku.part_number.clone(),
        parent_part_number: sku.parent_part_number.clone(),
        catentry_id: sku.catentry_id.clone(),
        parent_catentry_id: sku.parent_catentry_id.clone(),
        sku: sku.parent_part_number.clone(),
    })
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductDocument;

    fn fixture() -> ProductDocument {
        serde_json::from_str(
            r#"{
                "productsData": [{
                    "style": {
                        "name": "Dunk Low",
                        "primaryCategory": "cat-1",
                        "descriptiveAttributes": [
                            {"name": "Brand", "value": "Nike"},
                            {"name": "Gender", "value": "Women's"},
                            {"name": "Fit", "value": "True to size"}
                        ]
                    },
                    "skus": [
                        {
                            "partNumber": "p1", "parentPartNumber": "23NIK",
                            "catentryId": "c1", "parentCatentryId": "pc1",
                            "definingAttributes": [
                                {"name": "Color", "value": "White"},
                                {"name": "Shoe Size", "value": "7"},
                                {"name": "Shoe Width", "value": "B"}
                            ],
                            "prices": {"listPrice": 119.99, "offerPrice": 89.99}
                        },
                        {
                            "partNumber": "p2", "parentPartNumber": "23NIK",
                            "catentryId": "c2", "parentCatentryId": "pc1",
                            "definingAttributes": [
                                {"name": "Shoe Size", "value": "7 1/2"},
                                {"name": "Color", "value": "White"},
                                {"name": "Shoe Width", "value": "B"}
                            ],
                            "prices": {"listPrice": 109.99, "offerPrice": 109.99}
                        },
                        {
                            "partNumber": "p3", "parentPartNumber": "23NIK",
                            "catentryId": "c3", "parentCatentryId": "pc1",
                            "definingAttributes": [
                                {"name": "Color", "value": "Black"},
                                {"name": "Shoe Size", "value": "8"}
                            ],
                            "prices": {"listPrice": 129.99, "offerPrice": 129.99}
                        }
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn colors_are_distinct_in_first_seen_order() {
        let doc = fixture();
        assert_eq!(colors(doc.product().unwrap()), ["White", "Black"]);
    }

    #[test]
    fn color_match_ignores_attribute_position() {
        // Second SKU lists Color after Shoe Size; it must still count as White
        let doc = fixture();
        let facts = color_facts(doc.product().unwrap(), "White");
        assert_eq!(facts.joined_sizes(), "7 7_1/2");
    }

    #[test]
    fn sizes_dedupe_and_underscore_spaces() {
        let doc = fixture();
        let facts = color_facts(doc.product().unwrap(), "White");
        assert_eq!(facts.joined_sizes(), "7 7_1/2");
        assert_eq!(facts.joined_widths(), "B");
    }

    #[test]
    fn price_is_minimum_across_color_skus() {
        let doc = fixture();
        let facts = color_facts(doc.product().unwrap(), "White");
        assert_eq!(facts.price(), Some(109.99));
    }

    #[test]
    fn sale_price_only_when_strictly_below_list() {
        let doc = fixture();
        let product = doc.product().unwrap();

        let white = color_facts(product, "White");
        let price = white.price().unwrap();
        assert_eq!(white.sale_price(price), Some(89.99));

        let black = color_facts(product, "Black");
        let price = black.price().unwrap();
        assert_eq!(black.sale_price(price), None);
    }

    #[test]
    fn info_reads_style_attributes() {
        let doc = fixture();
        let info = product_info(doc.product().unwrap());
        assert_eq!(info.name, "Dunk Low");
        assert_eq!(info.brand, "Nike");
        assert_eq!(info.gender, "Women's");
    }

    #[test]
    fn codes_come_from_first_matching_sku() {
        let doc = fixture();
        let codes = product_codes(doc.product().unwrap(), "Black").unwrap();
        assert_eq!(codes.part_number, "p3");
        assert_eq!(codes.catentry_id, "c3");
        assert_eq!(codes.sku, "23NIK");
    }

    #[test]
    fn no_sku_for_unknown_color() {
        let doc = fixture();
        assert!(product_codes(doc.product().unwrap(), "Green").is_none());
        let facts = color_facts(doc.product().unwrap(), "Green");
        assert_eq!(facts.price(), None);
    }
}
