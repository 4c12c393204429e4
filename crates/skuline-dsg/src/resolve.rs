//! Category and image enrichment.
//!
//! Both resolvers are auxiliary fetches with documented skippable defaults:
//! a failed breadcrumb lookup degrades to a single "Home" category, a failed
//! image manifest to an empty gallery. Only transport failures propagate.

use reqwest::Client;
use skuline_core::{fetch_text, FetchBudget, TransportError};

use crate::api::{self, Endpoints};
use crate::model::{CategoryDocument, ImageSetDocument};
use crate::record::{CATEGORY_SLOTS, IMAGE_SLOTS, PLACEHOLDER};

/// jsonp callback envelope around the scene7 manifest
const JSONP_PREFIX: &str = "/*jsonp*/customScene7Handler(";
const JSONP_SUFFIX: &str = ",\"\");";

const FALLBACK_CATEGORY: &str = "Home";

/// Breadcrumb names for a primary-category identifier, padded to the fixed
/// 6 slots.
pub async fn categories(
    client: &Client,
    budget: &FetchBudget,
    endpoints: &Endpoints,
    identifier: &str,
) -> Result<Vec<String>, TransportError> {
    let url = endpoints.category_url(identifier);
    let names = match fetch_text(client, budget, &url, Some(identifier)).await? {
        Some(body) => match serde_json::from_str::<CategoryDocument>(&body) {
            Ok(doc) => doc.bread_crumb_details.into_iter().map(|b| b.name).collect(),
            Err(e) => {
                log::warn!("unparsable category listing for {identifier}: {e}");
                vec![FALLBACK_CATEGORY.to_string()]
            }
        },
        None => vec![FALLBACK_CATEGORY.to_string()],
    };
    Ok(pad_slots(names, CATEGORY_SLOTS))
}

/// Gallery rendering URLs for one (parent part number, color), padded to the
/// fixed 12 slots.
pub async fn images(
    client: &Client,
    budget: &FetchBudget,
    endpoints: &Endpoints,
    parent_part_number: &str,
    color: &str,
) -> Result<Vec<String>, TransportError> {
    let key = api::image_set_key(parent_part_number, color);
    let url = endpoints.image_set_url(&key);
    let urls = match fetch_text(client, budget, &url, Some(&key)).await? {
        Some(body) => match parse_image_set(&body, endpoints) {
            Ok(urls) => urls,
            Err(e) => {
                log::warn!("unparsable image set {key}: {e}");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    Ok(pad_slots(urls, IMAGE_SLOTS))
}

/// Strip the jsonp envelope textually and parse the manifest into rendering
/// URLs.
fn parse_image_set(body: &str, endpoints: &Endpoints) -> Result<Vec<String>, serde_json::Error> {
    let json = body.trim();
    let json = json.strip_prefix(JSONP_PREFIX).unwrap_or(json);
    let json = json.strip_suffix(JSONP_SUFFIX).unwrap_or(json);
    let doc: ImageSetDocument = serde_json::from_str(json)?;
    Ok(doc
        .set
        .item
        .into_iter()
        .map(|item| endpoints.image_render_url(&item.s.n))
        .collect())
}

/// Truncate or fill to exactly `slots` entries; empty slots carry "-".
fn pad_slots(mut values: Vec<String>, slots: usize) -> Vec<String> {
    values.truncate(slots);
    while values.len() < slots {
        values.push(PLACEHOLDER.to_string());
    }
    values
}
