//! Error types for element construction and initialization.

use thiserror::Error;

/// Errors raised while registering or initializing elements.
#[derive(Debug, Error)]
pub enum Error {
    /// A screened layer does not exist in the aquifer system.
    #[error("layer {layer} out of range for {naq} aquifers")]
    LayerIndex { layer: usize, naq: usize },

    /// Per-layer arrays of an element do not line up with its layer set.
    #[error("length of {name} needs to be {expected}, got {actual}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A variable-discharge well can only be screened in one layer.
    #[error("{0} can only be screened in a single layer")]
    SingleLayer(&'static str),

    /// Core error (aquifer or grid).
    #[error(transparent)]
    Core(#[from] seep_core::Error),
}

/// Result type for element operations.
pub type Result<T> = std::result::Result<T, Error>;
