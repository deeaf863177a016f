//! Analytic elements for the seep transient groundwater solver.
//!
//! Elements are sources and sinks with Laplace-domain influence functions
//! expressed on the modal basis of the aquifer system: wells (point sources),
//! line-sinks, ditches (strings of line-sinks with a shared head) and 1-D
//! strips. Elements with prescribed strengths only contribute to the field;
//! elements with a boundary condition additionally emit rows of the global
//! linear system through a condition-specific row emitter.

pub mod element;
pub mod equations;
pub mod error;
pub mod linesink;
pub mod oned;
pub mod well;

pub use element::{DischargeSchedule, Element, EquationBlock, EquationContext, Influence};
pub use error::{Error, Result};
pub use linesink::{head_line_sink_string, LineSink, LineSinkDitch};
pub use oned::{OneD, RightSide};
pub use well::Well;
