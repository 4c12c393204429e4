//! Two-pool fetch budget bounding in-flight requests.
//!
//! One pool caps concurrent fetch operations, the other caps how many
//! requests may sit inside their round-trip-timeout window at once. Both
//! are owned state passed into tasks, never globals.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admission control for fetch operations.
///
/// `acquire` awaits a slot from each pool (concurrency first, then timeout
/// window) and hands back an RAII permit pair. Release happens on drop,
/// unconditionally for success, HTTP error, and transport failure alike.
pub struct FetchBudget {
    concurrency: Arc<Semaphore>,
    timeout_window: Arc<Semaphore>,
}

/// RAII guard releasing one slot from each pool on drop.
pub struct BudgetPermit {
    _concurrency: OwnedSemaphorePermit,
    _timeout_window: OwnedSemaphorePermit,
}

impl FetchBudget {
    /// Create a budget with `concurrency` fetch slots and `timeout_window`
    /// timeout slots.
    pub fn new(concurrency: usize, timeout_window: usize) -> Self {
        Self {
            concurrency: Arc::new(Semaphore::new(concurrency)),
            timeout_window: Arc::new(Semaphore::new(timeout_window)),
        }
    }

    /// Wait until both pools admit the request.
    ///
    /// Tokio semaphores queue waiters FIFO, so every caller eventually
    /// acquires both slots.
    pub async fn acquire(&self) -> BudgetPermit {
        let concurrency = self
            .concurrency
            .clone()
            .acquire_owned()
            .await
            .expect("budget semaphore closed");
        let timeout_window = self
            .timeout_window
            .clone()
            .acquire_owned()
            .await
            .expect("budget semaphore closed");
        BudgetPermit {
            _concurrency: concurrency,
            _timeout_window: timeout_window,
        }
    }

    /// Free slots in each pool: (concurrency, timeout window).
    pub fn available(&self) -> (usize, usize) {
        (
            self.concurrency.available_permits(),
            self.timeout_window.available_permits(),
        )
    }
}
