//! Skuline Core - Common infrastructure for catalog scrape pipelines
//!
//! This crate provides the source-agnostic pieces: the shared HTTP client with
//! transport-error classification, the two-pool fetch budget, the run-wide
//! abort signal, the CSV ledger, and logging setup.

pub mod abort;
pub mod budget;
pub mod http;
pub mod ledger;
pub mod logging;

// Re-exports for convenience
pub use abort::{Abort, AbortReason};
pub use budget::{BudgetPermit, FetchBudget};
pub use http::{build_client, fetch_text, TransportError, TransportKind};
pub use ledger::{resume_urls, rollback_last_url, LedgerHandle, LedgerWriter, RowBatch};
pub use logging::init_logging;
