//! The output row schema and its serialization.
//!
//! Column names and order are fixed: the ledger is appended without a header
//! once it exists, so any change here breaks every ledger already on disk.

/// Placeholder for unpopulated schema slots.
pub const PLACEHOLDER: &str = "-";

pub const CURRENCY: &str = "$";

/// Column keying the ledger for resume and rollback.
pub const URL_COLUMN: &str = "pcurl";

pub const CATEGORY_SLOTS: usize = 6;
pub const IMAGE_SLOTS: usize = 12;
const DESCRIPTION_SLOTS: usize = 21;

/// Full ledger column schema, in order.
pub const LEDGER_HEADERS: &[&str] = &[
    "NO",
    "pcurl",
    "mburl",
    "Name",
    "Brand",
    "ProductCode1",
    "ProductCode2",
    "ProductCode3",
    "ProductCode4",
    "ProductCode5",
    "Sku",
    "Color",
    "Width",
    "Gender",
    "Category1",
    "Category2",
    "Category3",
    "Category4",
    "Category5",
    "Category6",
    "facetCategory",
    "Price",
    "SalePrice",
    "Currency",
    "Description0",
    "Description1",
    "Description2",
    "Description3",
    "Description4",
    "Description5",
    "Description6",
    "Description7",
    "Description8",
    "Description9",
    "Description10",
    "Description11",
    "Description12",
    "Description13",
    "Description14",
    "Description15",
    "Description16",
    "Description17",
    "Description18",
    "Description19",
    "Description20",
    "Size",
    "Image1",
    "Image2",
    "Image3",
    "Image4",
    "Image5",
    "Image6",
    "Image7",
    "Image8",
    "Image9",
    "Image10",
    "Image11",
    "Image12",
    "Thumbnail",
];

/// Identifiers taken from the first SKU matching a color.
#[derive(Debug, Clone, Default)]
pub struct ProductCodes {
    pub part_number: String,
    pub parent_part_number: String,
    pub catentry_id: String,
    pub parent_catentry_id: String,
    pub sku: String,
}

/// One output row: a (product, color) variant.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub source_url: String,
    pub name: String,
    pub brand: String,
    pub codes: ProductCodes,
    pub color: String,
    /// Space-joined deduplicated width set
    pub widths: String,
    /// Space-joined deduplicated size set
    pub sizes: String,
    pub gender: String,
    /// Exactly `CATEGORY_SLOTS` entries, placeholder-filled
    pub categories: Vec<String>,
    /// Minimum list price across the color's SKUs
    pub price: f64,
    /// Minimum offer price, present only when strictly below `price`
    pub sale_price: Option<f64>,
    /// Exactly `IMAGE_SLOTS` entries, placeholder-filled
    pub images: Vec<String>,
}

impl VariantRecord {
    /// Serialize to one ledger row matching `LEDGER_HEADERS`.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(LEDGER_HEADERS.len());
        row.push(PLACEHOLDER.to_string()); // NO
        row.push(self.source_url.clone());
        row.push(PLACEHOLDER.to_string()); // mburl
        row.push(self.name.clone());
        row.push(self.brand.clone());
        row.push(self.codes.part_number.clone());
        row.push(self.codes.parent_part_number.clone());
        row.push(self.codes.catentry_id.clone());
        row.push(self.codes.parent_catentry_id.clone());
        row.push(PLACEHOLDER.to_string()); // ProductCode5
        row.push(self.codes.sku.clone());
        row.push(self.color.clone());
        row.push(self.widths.clone());
        row.push(self.gender.clone());
        row.extend(self.categories.iter().cloned());
        row.push(PLACEHOLDER.to_string()); // facetCategory
        row.push(format_price(self.price));
        row.push(
            self.sale_price
                .map(format_price)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        );
        row.push(CURRENCY.to_string());
        row.extend(std::iter::repeat(PLACEHOLDER.to_string()).take(DESCRIPTION_SLOTS));
        row.push(self.sizes.clone());
        row.extend(self.images.iter().cloned());
        row.push(PLACEHOLDER.to_string()); // Thumbnail
        debug_assert_eq!(row.len(), LEDGER_HEADERS.len());
        row
    }
}

/// Minimal decimal rendering: 119.99 → "119.99", 120.0 → "120".
fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VariantRecord {
        VariantRecord {
            source_url: "https://example.com/p/dunk/23nik".to_string(),
            name: "Dunk Low".to_string(),
            brand: "Nike".to_string(),
            codes: ProductCodes {
                part_number: "12345".to_string(),
                parent_part_number: "23NIK".to_string(),
                catentry_id: "111".to_string(),
                parent_catentry_id: "222".to_string(),
                sku: "23NIK".to_string(),
            },
            color: "White".to_string(),
            widths: "B".to_string(),
            sizes: "7 7_5".to_string(),
            gender: "Women's".to_string(),
            categories: vec!["Home".to_string(); CATEGORY_SLOTS],
            price: 119.99,
            sale_price: Some(89.99),
            images: vec![PLACEHOLDER.to_string(); IMAGE_SLOTS],
        }
    }

    #[test]
    fn row_arity_matches_schema() {
        assert_eq!(LEDGER_HEADERS.len(), 59);
        assert_eq!(sample().to_row().len(), LEDGER_HEADERS.len());
    }

    #[test]
    fn absent_sale_price_is_placeholder() {
        let mut record = sample();
        record.sale_price = None;
        let row = record.to_row();
        let idx = LEDGER_HEADERS.iter().position(|h| *h == "SalePrice").unwrap();
        assert_eq!(row[idx], PLACEHOLDER);
    }

    #[test]
    fn price_columns_render_minimal_decimals() {
        let mut record = sample();
        record.price = 120.0;
        record.sale_price = Some(89.99);
        let row = record.to_row();
        let price_idx = LEDGER_HEADERS.iter().position(|h| *h == "Price").unwrap();
        assert_eq!(row[price_idx], "120");
        assert_eq!(row[price_idx + 1], "89.99");
        assert_eq!(row[price_idx + 2], CURRENCY);
    }

    #[test]
    fn url_lands_in_the_resume_column() {
        let row = sample().to_row();
        let idx = LEDGER_HEADERS.iter().position(|h| *h == URL_COLUMN).unwrap();
        assert_eq!(row[idx], "https://example.com/p/dunk/23nik");
    }

    #[test]
    fn descriptions_are_placeholders() {
        let row = sample().to_row();
        let first = LEDGER_HEADERS.iter().position(|h| *h == "Description0").unwrap();
        for offset in 0..21 {
            assert_eq!(row[first + offset], PLACEHOLDER);
        }
    }
}
