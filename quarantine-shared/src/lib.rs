//! Shared error and control types for the quarantine policy engine.

pub mod cancellation;
pub mod errors;

pub use cancellation::CancellationToken;
pub use errors::{QuarantineError, QuarantineResult};
