//! Error types for the core aquifer representation.

use thiserror::Error;

/// Errors raised while building an aquifer system or its modal basis.
#[derive(Debug, Error)]
pub enum Error {
    /// An input array does not have the length required by the layering.
    #[error("length of {name} needs to be {expected}, got {actual}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A layer interface pair is inverted.
    #[error("negative layer thickness between interfaces {0} and {1}")]
    NegativeThickness(usize, usize),

    /// The time window is empty or starts at a non-positive time.
    #[error("time window must satisfy 0 < tmin < tmax, got [{tmin}, {tmax}]")]
    TimeWindow { tmin: f64, tmax: f64 },

    /// The Fourier-series half-length is too small for the inversion.
    #[error("Fourier-series half-length M must be at least 4, got {0}")]
    FourierLength(usize),

    /// Unrecognized top-boundary token.
    #[error("unknown top boundary '{0}' (expected 'imp', 'lea' or 'sem')")]
    UnknownTopBoundary(String),

    /// The QR iteration on the vertical-flow operator did not converge.
    #[error("eigendecomposition did not converge for Laplace parameter {re}+{im}i")]
    Eigendecomposition { re: f64, im: f64 },

    /// The eigenvector matrix could not be inverted.
    #[error("singular modal matrix for Laplace parameter {re}+{im}i")]
    SingularModes { re: f64, im: f64 },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
