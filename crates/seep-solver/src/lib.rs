//! Linear solvers and global-system assembly for seep.
//!
//! The Laplace-domain model produces one dense complex system per Laplace
//! parameter; the systems are independent and solved as a batch. Assembly
//! gathers the boundary-condition rows of every element, the batch solver
//! factors each system with partial-pivot LU, and the solutions are
//! scattered back into the element strength tensors.

pub mod assemble;
pub mod batch;
pub mod error;
pub mod linear;

pub use assemble::solve_system;
pub use batch::solve_batch_complex;
pub use error::{Error, Result};
pub use linear::solve_complex;
