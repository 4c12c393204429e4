//! Run-wide abort signal.
//!
//! A fatal transport failure (or an interrupt) cancels every in-flight task
//! through one broadcast token; the orchestrator then drains, cleans up and
//! exits with the matching code.

use std::sync::Arc;
use std::sync::OnceLock;

use tokio_util::sync::CancellationToken;

/// Why the run was aborted. Decides rollback and the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// Connection/TLS/timeout failure — rollback, exit 1
    FatalTransport,
    /// SIGINT — no rollback, exit 130
    Interrupted,
}

/// Cloneable abort handle shared by the orchestrator and all tasks.
///
/// The first `trigger` wins; later calls keep the original reason.
#[derive(Clone, Default)]
pub struct Abort {
    token: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl Abort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast the abort to every task racing against `cancelled()`.
    pub fn trigger(&self, reason: AbortReason) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason recorded by the first trigger, if any.
    pub fn reason(&self) -> Option<AbortReason> {
        self.reason.get().copied()
    }

    /// Resolves once the run is aborted.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
