//! One pipeline task: fetch a product document, extract its color variants,
//! enrich them, and queue the rows as a single batch.

use std::sync::Arc;

use reqwest::Client;
use skuline_core::{fetch_text, Abort, FetchBudget, LedgerHandle, RowBatch, TransportError};

use crate::api::{self, Endpoints};
use crate::extract::{self, MalformedProduct};
use crate::model::ProductDocument;
use crate::record::VariantRecord;
use crate::resolve;

/// State shared by every task in a run.
pub struct TaskContext {
    pub client: Client,
    pub budget: FetchBudget,
    pub endpoints: Endpoints,
    pub ledger: LedgerHandle,
    pub abort: Abort,
}

/// Tagged result of processing one product-detail link.
#[derive(Debug)]
pub enum TaskOutcome {
    /// Variant rows queued to the ledger
    Saved { rows: usize },
    /// Primary fetch returned non-200; the product is skipped
    NoData,
    /// Document did not yield usable variants
    Malformed { reason: String },
    /// Transport failure — fatal for the whole run
    Fatal(TransportError),
    /// Run aborted before this task finished
    Aborted,
}

enum PipelineError {
    Malformed(MalformedProduct),
    Transport(TransportError),
}

impl From<MalformedProduct> for PipelineError {
    fn from(e: MalformedProduct) -> Self {
        Self::Malformed(e)
    }
}

impl From<TransportError> for PipelineError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Process one product link end to end, racing the run-wide abort signal.
pub async fn process_link(ctx: Arc<TaskContext>, link: String) -> TaskOutcome {
    tokio::select! {
        _ = ctx.abort.cancelled() => TaskOutcome::Aborted,
        outcome = run_pipeline(&ctx, &link) => outcome,
    }
}

async fn run_pipeline(ctx: &TaskContext, link: &str) -> TaskOutcome {
    log::info!("processing {link}");
    let part_number = api::part_number_from_link(link);
    let url = ctx.endpoints.product_detail_url(&part_number);

    let body = match fetch_text(&ctx.client, &ctx.budget, &url, None).await {
        Ok(Some(body)) => body,
        Ok(None) => return TaskOutcome::NoData,
        Err(e) => return TaskOutcome::Fatal(e),
    };

    let doc: ProductDocument = match serde_json::from_str(&body) {
        Ok(doc) => doc,
        Err(e) => {
            return TaskOutcome::Malformed {
                reason: format!("invalid product JSON: {e}"),
            }
        }
    };

    match build_rows(ctx, &doc, link).await {
        Ok(rows) => {
            let count = rows.len();
            // One batch per product: all variants land together or not at all
            match ctx.ledger.write(rows).await {
                Ok(()) => TaskOutcome::Saved { rows: count },
                Err(_) => TaskOutcome::Aborted,
            }
        }
        Err(PipelineError::Malformed(e)) => TaskOutcome::Malformed {
            reason: e.to_string(),
        },
        Err(PipelineError::Transport(e)) => TaskOutcome::Fatal(e),
    }
}

/// Build one row per detected color, enriching each with breadcrumbs and
/// gallery images.
async fn build_rows(
    ctx: &TaskContext,
    doc: &ProductDocument,
    link: &str,
) -> Result<RowBatch, PipelineError> {
    let product = doc.product().ok_or(MalformedProduct::NoProductData)?;
    let colors = extract::colors(product);
    if colors.is_empty() {
        return Err(MalformedProduct::NoColors.into());
    }
    log::debug!("{link}: {} color variant(s)", colors.len());

    let info = extract::product_info(product);
    let mut rows = RowBatch::with_capacity(colors.len());
    for color in &colors {
        let facts = extract::color_facts(product, color);
        let price = facts.price().ok_or_else(|| MalformedProduct::NoListPrice {
            color: color.clone(),
        })?;
        let codes = extract::product_codes(product, color).ok_or_else(|| {
            MalformedProduct::NoMatchingSku {
                color: color.clone(),
            }
        })?;

        let categories = resolve::categories(
            &ctx.client,
            &ctx.budget,
            &ctx.endpoints,
            &product.style.primary_category,
        )
        .await?;
        let images = resolve::images(
            &ctx.client,
            &ctx.budget,
            &ctx.endpoints,
            &codes.parent_part_number,
            color,
        )
        .await?;

        let record = VariantRecord {
            source_url: link.to_string(),
            name: info.name.clone(),
            brand: info.brand.clone(),
            sale_price: facts.sale_price(price),
            color: color.clone(),
            widths: facts.joined_widths(),
            sizes: facts.joined_sizes(),
            gender: info.gender.clone(),
            categories,
            price,
            images,
            codes,
        };
        rows.push(record.to_row());
    }
    Ok(rows)
}
