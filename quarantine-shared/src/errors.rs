//! Error types used across the quarantine engine.

use thiserror::Error;

/// Result type for quarantine engine operations.
pub type QuarantineResult<T> = Result<T, QuarantineError>;

/// The error taxonomy from the component design: validation failures are
/// the caller's fault, `NotFound` is a profile-library lookup miss,
/// `Internal` covers store/sink failures, `Cancelled` covers a tripped
/// cancellation token. Predicate evaluation errors are deliberately *not*
/// a variant here — they are suppressed at the classifier boundary and
/// never surface to a manager caller.
#[derive(Debug, Error)]
pub enum QuarantineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl QuarantineError {
    /// Maps the taxonomy to the status codes named in the component design
    /// (400/404/500/499). A CLI front-end turns these into process exit
    /// codes instead; an RPC front-end would use these directly.
    pub fn status_code(&self) -> u16 {
        match self {
            QuarantineError::Validation(_) => 400,
            QuarantineError::NotFound(_) => 404,
            QuarantineError::Internal(_) => 500,
            QuarantineError::Cancelled => 499,
        }
    }
}

impl From<std::io::Error> for QuarantineError {
    fn from(err: std::io::Error) -> Self {
        QuarantineError::Internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for QuarantineError {
    fn from(err: serde_json::Error) -> Self {
        QuarantineError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for QuarantineError {
    fn from(err: rusqlite::Error) -> Self {
        QuarantineError::Internal(format!("sqlite error: {}", err))
    }
}

impl From<String> for QuarantineError {
    fn from(err: String) -> Self {
        QuarantineError::Internal(err)
    }
}

impl From<&str> for QuarantineError {
    fn from(err: &str) -> Self {
        QuarantineError::Internal(err.to_string())
    }
}
