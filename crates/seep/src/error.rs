//! Top-level error type.

use thiserror::Error;

/// Errors surfaced by the model facade.
#[derive(Debug, Error)]
pub enum Error {
    /// Aquifer, grid or builder configuration error.
    #[error(transparent)]
    Core(#[from] seep_core::Error),

    /// Element registration or initialization error.
    #[error(transparent)]
    Element(#[from] seep_elements::Error),

    /// Assembly or linear-solve error.
    #[error(transparent)]
    Solver(#[from] seep_solver::Error),

    /// Evaluation was requested before `solve`.
    #[error("model must be solved before evaluation")]
    NotSolved,

    /// The variable-discharge evaluator hit an element without a schedule.
    #[error("element '{0}' does not carry a discharge schedule")]
    NotVariable(String),

    /// No element of the model carries a discharge schedule.
    #[error("no variable-discharge element in the model")]
    NoSchedule,

    /// An element handle does not refer to a registered element.
    #[error("no element with index {0}")]
    UnknownElement(usize),

    /// The queried element has no physical location.
    #[error("element '{0}' has no location to evaluate at")]
    NoLocation(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
