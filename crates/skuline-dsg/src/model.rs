//! Serde documents for the product, category, and image APIs.
//!
//! The catalog feed is loose about scalar types: prices arrive as numbers or
//! strings, attribute and identifier values occasionally as bare numbers,
//! and the scene7 manifest collapses a single-image set to one object
//! instead of an array. The deserializers here absorb all of that.

use serde::{Deserialize, Deserializer};

/// Raw product-detail document for one catalog part number. Immutable once
/// fetched; scoped to one task.
#[derive(Debug, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "productsData", default)]
    pub products_data: Vec<Product>,
}

impl ProductDocument {
    /// The single product carried by a by-part-number lookup.
    pub fn product(&self) -> Option<&Product> {
        self.products_data.first()
    }
}

#[derive(Debug, Deserialize)]
pub struct Product {
    pub style: Style,
    #[serde(default)]
    pub skus: Vec<Sku>,
}

#[derive(Debug, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "primaryCategory", default)]
    pub primary_category: String,
    #[serde(rename = "descriptiveAttributes", default)]
    pub descriptive_attributes: Vec<Attribute>,
}

#[derive(Debug, Deserialize)]
pub struct Sku {
    #[serde(rename = "partNumber", default, deserialize_with = "de_flex_string")]
    pub part_number: String,
    #[serde(rename = "parentPartNumber", default, deserialize_with = "de_flex_string")]
    pub parent_part_number: String,
    #[serde(rename = "catentryId", default, deserialize_with = "de_flex_string")]
    pub catentry_id: String,
    #[serde(rename = "parentCatentryId", default, deserialize_with = "de_flex_string")]
    pub parent_catentry_id: String,
    #[serde(rename = "definingAttributes", default)]
    pub defining_attributes: Vec<Attribute>,
    #[serde(default)]
    pub prices: Prices,
}

/// A named facet distinguishing SKUs (Color, Shoe Size, Shoe Width, ...).
#[derive(Debug, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Prices {
    #[serde(rename = "listPrice", default, deserialize_with = "de_price")]
    pub list_price: Option<f64>,
    #[serde(rename = "offerPrice", default, deserialize_with = "de_price")]
    pub offer_price: Option<f64>,
}

/// Category-breadcrumb listing for an identifier.
#[derive(Debug, Deserialize)]
pub struct CategoryDocument {
    #[serde(rename = "breadCrumbDetails", default)]
    pub bread_crumb_details: Vec<Breadcrumb>,
}

#[derive(Debug, Deserialize)]
pub struct Breadcrumb {
    #[serde(default)]
    pub name: String,
}

/// Scene7 image-set manifest (after the jsonp envelope is stripped).
#[derive(Debug, Deserialize)]
pub struct ImageSetDocument {
    pub set: ImageSet,
}

#[derive(Debug, Deserialize)]
pub struct ImageSet {
    #[serde(default, deserialize_with = "de_one_or_many")]
    pub item: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
pub struct ImageItem {
    pub s: ImageSource,
}

#[derive(Debug, Deserialize)]
pub struct ImageSource {
    #[serde(default)]
    pub n: String,
}

/// Number-or-string price; empty and unparsable strings count as absent.
fn de_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Str(s)) => s.trim().parse().ok(),
    })
}

/// String-valued field that the feed sometimes emits as a bare number.
fn de_flex_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(f64),
        Bool(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Str(s)) => s,
        Some(Raw::Num(n)) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(Raw::Num(n)) => n.to_string(),
        Some(Raw::Bool(b)) => b.to_string(),
    })
}

/// Accept both `"item": {...}` and `"item": [...]`.
fn de_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(v) => v,
        OneOrMany::One(x) => vec![x],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_document_mixed_scalar_types() {
        let doc: ProductDocument = serde_json::from_str(
            r#"{
                "productsData": [{
                    "style": {
                        "name": "Dunk Low",
                        "primaryCategory": "cat-1",
                        "descriptiveAttributes": [{"name": "Brand", "value": "Nike"}]
                    },
                    "skus": [{
                        "partNumber": 12345,
                        "parentPartNumber": "23NIK",
                        "catentryId": "111",
                        "parentCatentryId": 222,
                        "definingAttributes": [
                            {"name": "Color", "value": "White"},
                            {"name": "Shoe Size", "value": 7.5}
                        ],
                        "prices": {"listPrice": "119.99", "offerPrice": 89.99}
                    }]
                }]
            }"#,
        )
        .unwrap();

        let product = doc.product().unwrap();
        assert_eq!(product.style.name, "Dunk Low");
        let sku = &product.skus[0];
        assert_eq!(sku.part_number, "12345");
        assert_eq!(sku.parent_catentry_id, "222");
        assert_eq!(sku.defining_attributes[1].value, "7.5");
        assert_eq!(sku.prices.list_price, Some(119.99));
        assert_eq!(sku.prices.offer_price, Some(89.99));
    }

    #[test]
    fn empty_and_missing_prices_are_none() {
        let prices: Prices =
            serde_json::from_str(r#"{"listPrice": "", "offerPrice": null}"#).unwrap();
        assert_eq!(prices.list_price, None);
        assert_eq!(prices.offer_price, None);

        let prices: Prices = serde_json::from_str("{}").unwrap();
        assert_eq!(prices.list_price, None);
    }

    #[test]
    fn missing_products_data_is_empty() {
        let doc: ProductDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.product().is_none());
    }

    #[test]
    fn image_set_single_item_object() {
        let doc: ImageSetDocument =
            serde_json::from_str(r#"{"set": {"item": {"s": {"n": "GolfGalaxy/a_is_1"}}}}"#)
                .unwrap();
        assert_eq!(doc.set.item.len(), 1);
        assert_eq!(doc.set.item[0].s.n, "GolfGalaxy/a_is_1");
    }

    #[test]
    fn image_set_item_array() {
        let doc: ImageSetDocument = serde_json::from_str(
            r#"{"set": {"item": [{"s": {"n": "GolfGalaxy/a_1"}}, {"s": {"n": "GolfGalaxy/a_2"}}]}}"#,
        )
        .unwrap();
        assert_eq!(doc.set.item.len(), 2);
    }

    #[test]
    fn breadcrumbs_parse_in_order() {
        let doc: CategoryDocument = serde_json::from_str(
            r#"{"breadCrumbDetails": [{"name": "Home"}, {"name": "Shoes"}, {"name": "Sneakers"}]}"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.bread_crumb_details.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Home", "Shoes", "Sneakers"]);
    }
}
