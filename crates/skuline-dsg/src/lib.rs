//! Skuline DSG - product-detail pipeline for the Dick's Sporting Goods APIs
//!
//! Fetches product documents by part number, normalizes color variants,
//! enriches them with breadcrumb categories and gallery images, and appends
//! rows to the CSV ledger.

pub mod api;
pub mod config;
pub mod extract;
pub mod model;
pub mod record;
pub mod resolve;
pub mod runner;
pub mod session;
pub mod stats;
pub mod task;

// Re-exports
pub use api::Endpoints;
pub use config::Config;
pub use record::{VariantRecord, LEDGER_HEADERS};
pub use runner::{run, RunStatus};
pub use stats::RunSummary;
pub use task::TaskOutcome;
