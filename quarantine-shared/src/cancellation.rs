//! Cooperative cancellation token passed through every manager operation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::QuarantineError;

/// A cheaply-cloneable, shared cancellation flag.
///
/// The core performs no internal retries and no network I/O; a tripped
/// token simply causes the current operation to return
/// [`QuarantineError::Cancelled`] at its next suspension point (a store
/// call, a sink write). Checking is explicit rather than via a future
/// combinator so synchronous call sites can use it too.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Trip the token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Suspension-point check: call at the start of an operation and
    /// before any effectful step (store write, audit emission).
    pub fn check(&self) -> Result<(), QuarantineError> {
        if self.is_cancelled() {
            Err(QuarantineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_not_cancelled() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());
    }

    #[test]
    fn cancel_trips_shared_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(QuarantineError::Cancelled)));
    }
}
