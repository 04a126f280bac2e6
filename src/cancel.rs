use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, TraynetError};

/// Cooperative cancellation shared between a caller and a running operation.
///
/// Operations poll the flag at each outer loop (pair scans, open-set pops)
/// and stop with [`TraynetError::Cancelled`] once it is raised.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the lowered state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` if cancellation has been requested.
    ///
    /// # Errors
    ///
    /// Returns [`TraynetError::Cancelled`] when the flag is raised.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(TraynetError::Cancelled);
        }
        Ok(())
    }
}
