//! Error types for assembly and solving.

use thiserror::Error;

/// Errors raised while assembling or solving the global system.
#[derive(Debug, Error)]
pub enum Error {
    /// Matrix/vector dimensions do not line up.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A single dense system was singular.
    #[error("singular matrix")]
    SingularMatrix,

    /// Some systems in the batch were singular, usually a sign of degenerate
    /// element geometry.
    #[error("{} of {} Laplace-parameter systems were singular", indices.len(), total)]
    SingularBatch { indices: Vec<usize>, total: usize },

    /// An element reported unknowns but emitted no equation rows.
    #[error("element '{0}' has unknowns but emitted no equation")]
    MissingEquation(String),

    /// Element error during assembly.
    #[error(transparent)]
    Element(#[from] seep_elements::Error),
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;
