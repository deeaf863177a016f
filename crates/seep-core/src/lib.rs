//! Core representation for the seep transient groundwater solver.
//!
//! This crate provides:
//! - The layered aquifer system description ([`AquiferData`])
//! - The Laplace-parameter grid over logarithmic time intervals ([`LaplaceGrid`])
//! - The modal decomposition of the vertical-flow operator ([`ModalBasis`])
//!
//! A multi-aquifer system couples its layers through leaky aquitards. At every
//! Laplace parameter the coupling operator is a small tridiagonal matrix whose
//! eigendecomposition turns the coupled system into independent modes, each
//! decaying radially with its own characteristic length.

pub mod aquifer;
pub mod error;
pub mod laplace;
pub mod modal;

pub use aquifer::{Aquifer, AquiferData, TopBoundary};
pub use error::{Error, Result};
pub use laplace::LaplaceGrid;
pub use modal::{ModalBasis, ModalDecomposition};
