//! Special-function kernels for the seep transient groundwater solver.
//!
//! Everything here is plain numerics with no model state:
//! - Modified Bessel functions K0 and K1 of complex argument
//! - The line integral of K0 along a segment (line-sink influence)
//! - Circle–segment intersection (influence truncation)
//! - The de Hoog inverse Laplace transform over one logarithmic interval

pub mod bessel;
pub mod invlap;

pub use bessel::{besselk0, besselk0_line, besselk01, besselk1, circle_line_intersection};
pub use invlap::dehoog;
