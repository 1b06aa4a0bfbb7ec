//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations inside the pure rewriting logic.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
