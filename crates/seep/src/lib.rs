//! Transient multi-aquifer groundwater flow by analytic elements.
//!
//! `seep` computes transient heads in a horizontally infinite, vertically
//! layered aquifer system. Wells, line-sinks and 1-D strips are superposed
//! in the Laplace domain on the modal basis of the layered system; the
//! boundary conditions at element control points are enforced by one dense
//! complex solve per Laplace parameter, and heads in time follow from the
//! de Hoog inverse transform per logarithmic interval.
//!
//! # Example
//!
//! A single confined aquifer pumped by one well:
//!
//! ```
//! use seep::{MaqConfig, Model, Well};
//!
//! let mut ml = Model::maq(&MaqConfig {
//!     kaq: vec![10.0],
//!     z: vec![10.0, 0.0],
//!     saq: vec![1e-5],
//!     tmin: 1.0,
//!     tmax: 100.0,
//!     ..Default::default()
//! })
//! .unwrap();
//! ml.add(Well::new(0.0, 0.0, 0.1, &[100.0], &[0]));
//! ml.solve().unwrap();
//!
//! let h = ml.head(30.0, 0.0, &[10.0]).unwrap();
//! assert!(h[(0, 0)] < 0.0); // drawdown from pumping
//! ```

pub mod builder;
pub mod error;
pub mod model;

pub use builder::{MaqConfig, Quasi3dConfig};
pub use error::{Error, Result};
pub use model::{ElementId, Model};

pub use seep_core::{Aquifer, AquiferData, LaplaceGrid, ModalBasis, TopBoundary};
pub use seep_elements::{
    head_line_sink_string, DischargeSchedule, Element, LineSink, LineSinkDitch, OneD, RightSide,
    Well,
};
