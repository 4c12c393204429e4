//! Endpoint construction for the retailer's internal JSON APIs

/// Store identifier baked into the catalog and category endpoints.
pub const STORE_ID: &str = "15108";

/// Fixed rendering query for gallery images (1920px wide, quality 70,
/// progressive JPEG, sharpened).
const IMAGE_RENDER_QUERY: &str = "qlt=70&wid=1920&fmt=pjpeg&op_sharpen=1";

const PRODUCT_API: &str = "https://api-search.dickssportinggoods.com/catalog-productdetails/v4/byPartNumber";
const CATEGORY_API: &str = "https://api-search.dickssportinggoods.com/seo-category/v1/categories/identifier";
const IMAGE_API: &str = "https://dks.scene7.com/is/image";

/// Base URLs of the three consumed APIs.
///
/// Overridable through the config file (tests point these at a local mock
/// server); defaults are the production endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub product_api: String,
    pub category_api: String,
    pub image_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            product_api: PRODUCT_API.to_string(),
            category_api: CATEGORY_API.to_string(),
            image_api: IMAGE_API.to_string(),
        }
    }
}

impl Endpoints {
    /// Product-detail-by-part-number lookup.
    pub fn product_detail_url(&self, part_number: &str) -> String {
        format!(
            "{}/{STORE_ID}?id={part_number}&inventory=true&clearance=false",
            self.product_api
        )
    }

    /// Category-breadcrumb lookup for a primary-category identifier.
    pub fn category_url(&self, identifier: &str) -> String {
        format!("{}/{identifier}?storeId={STORE_ID}", self.category_api)
    }

    /// Image-set manifest lookup (response is jsonp-wrapped JSON).
    pub fn image_set_url(&self, key: &str) -> String {
        format!(
            "{}/GolfGalaxy/{key}?req=set,json,UTF-8&labelkey=label&handler=customScene7Handler",
            self.image_api
        )
    }

    /// Fully-qualified rendering URL for one image name from the manifest.
    pub fn image_render_url(&self, name: &str) -> String {
        format!("{}/{name}?{IMAGE_RENDER_QUERY}", self.image_api)
    }
}

/// Catalog part number from a product-detail link: the slug's last path
/// segment, upper-cased.
pub fn part_number_from_link(link: &str) -> String {
    link.rsplit('/').next().unwrap_or(link).to_uppercase()
}

/// Image-set manifest key for one (parent part number, color). Spaces and
/// slashes in the color collapse to underscores.
pub fn image_set_key(parent_part_number: &str, color: &str) -> String {
    let color = color.replace([' ', '/'], "_");
    format!("{parent_part_number}_{color}_is")
}
