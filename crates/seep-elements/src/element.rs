//! The element abstraction and its modal-projection helpers.

use nalgebra::DMatrix;
use num_complex::Complex64;
use seep_core::{Aquifer, LaplaceGrid};

use crate::error::Result;

/// Modal influence tensor: one `naq x np` matrix per element parameter.
///
/// Row `i` of each matrix is the contribution of aquifer mode `i`; physical
/// layer values are obtained by multiplying with the eigenvector matrix of
/// the parameter's modal decomposition.
pub type Influence = Vec<DMatrix<Complex64>>;

/// Breakpoints of a variable-discharge element.
///
/// At `tstart[k]` the pumping rate changes by `dq[k]`; the time-domain
/// response is the superposition of unit step responses shifted to the
/// breakpoints and scaled by the increments.
#[derive(Debug, Clone)]
pub struct DischargeSchedule {
    /// Switch-on times, ascending.
    pub tstart: Vec<f64>,
    /// Discharge increments at the switch times.
    pub dq: Vec<f64>,
}

/// Context handed to an element while it emits its equation rows.
pub struct EquationContext<'a> {
    /// All elements of the model, in registration order.
    pub elements: &'a [Box<dyn Element>],
    /// Index of the element emitting rows.
    pub self_index: usize,
    /// Total number of unknowns of the model.
    pub neq: usize,
    pub aq: &'a Aquifer,
    pub grid: &'a LaplaceGrid,
}

/// The rows one element contributes to the global system.
pub struct EquationBlock {
    /// One `neq x np` coefficient matrix per unknown of the element.
    pub mat: Vec<DMatrix<Complex64>>,
    /// Right-hand side, `nunknowns x np`.
    pub rhs: DMatrix<Complex64>,
}

/// A source or sink with Laplace-domain influence functions.
///
/// The lifecycle is: construct and register with the model, `initialize`
/// during solve (resolves modal coefficients against the aquifer), solved
/// (parameters filled per Laplace parameter), then queried.
pub trait Element: Send + Sync {
    /// Display name of the element kind.
    fn name(&self) -> &str;

    /// Number of strength parameters.
    fn nparam(&self) -> usize;

    /// Number of unknowns contributed to the global system.
    fn nunknowns(&self) -> usize;

    /// Screened layers (0-based), one per parameter.
    fn layers(&self) -> &[usize];

    /// Resolve modal coefficients against the aquifer. Called by solve.
    fn initialize(&mut self, aq: &Aquifer, grid: &LaplaceGrid) -> Result<()>;

    /// Modal influence per unit strength at `(x, y)`.
    fn potinf(&self, x: f64, y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> Influence;

    /// Modal layer-discharge influence per unit strength.
    fn dischargeinf(&self, aq: &Aquifer, grid: &LaplaceGrid) -> Influence;

    /// Strengths at every Laplace parameter, `nparam x np`.
    fn parameters(&self) -> &DMatrix<Complex64>;

    /// Mutable strengths; written by the solver.
    fn parameters_mut(&mut self) -> &mut DMatrix<Complex64>;

    /// Boundary-condition rows; `None` for elements without unknowns.
    fn equation(&self, _ctx: &EquationContext<'_>) -> Option<EquationBlock> {
        None
    }

    /// Location where the boundary condition is enforced.
    fn control_point(&self) -> Option<(f64, f64)> {
        None
    }

    /// Physical location of the element (for borehole-head queries).
    fn location(&self) -> Option<(f64, f64)> {
        None
    }

    /// Variable-discharge breakpoints, if the element carries them.
    fn schedule(&self) -> Option<&DischargeSchedule> {
        None
    }

    /// Entry-resistance factor per screened layer, where defined.
    fn resistance_factor(&self) -> Option<&[f64]> {
        None
    }

    /// Strength-weighted modal potential at `(x, y)`, `naq x np`.
    fn potential(&self, x: f64, y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> DMatrix<Complex64> {
        let inf = self.potinf(x, y, aq, grid);
        let params = self.parameters();
        let naq = aq.naq();
        let np = grid.np();
        let mut rv = DMatrix::zeros(naq, np);
        for (i, m) in inf.iter().enumerate() {
            for k in 0..np {
                let s = params[(i, k)];
                for l in 0..naq {
                    rv[(l, k)] += s * m[(l, k)];
                }
            }
        }
        rv
    }

    /// Influence projected onto physical `layers`: one `nparam x np` matrix
    /// per requested layer.
    fn potinflayer(
        &self,
        x: f64,
        y: f64,
        layers: &[usize],
        aq: &Aquifer,
        grid: &LaplaceGrid,
    ) -> Vec<DMatrix<Complex64>> {
        let inf = self.potinf(x, y, aq, grid);
        let naq = aq.naq();
        let np = grid.np();
        let nparam = self.nparam();
        let mut rv = vec![DMatrix::zeros(nparam, np); layers.len()];
        for k in 0..np {
            let eig = &aq.basis.modes[k].eigvec;
            for (i, m) in inf.iter().enumerate() {
                for (r, &l) in layers.iter().enumerate() {
                    let mut acc = Complex64::new(0.0, 0.0);
                    for mode in 0..naq {
                        acc += eig[(l, mode)] * m[(mode, k)];
                    }
                    rv[r][(i, k)] = acc;
                }
            }
        }
        rv
    }

    /// Strength-weighted potential projected onto physical `layers`,
    /// `layers.len() x np`.
    fn potentiallayer(
        &self,
        x: f64,
        y: f64,
        layers: &[usize],
        aq: &Aquifer,
        grid: &LaplaceGrid,
    ) -> DMatrix<Complex64> {
        let pot = self.potential(x, y, aq, grid);
        let naq = aq.naq();
        let np = grid.np();
        let mut rv = DMatrix::zeros(layers.len(), np);
        for k in 0..np {
            let eig = &aq.basis.modes[k].eigvec;
            for (r, &l) in layers.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for mode in 0..naq {
                    acc += eig[(l, mode)] * pot[(mode, k)];
                }
                rv[(r, k)] = acc;
            }
        }
        rv
    }

    /// Per-unit-strength discharge of each parameter in its own layer,
    /// `nparam x np`.
    fn strengthinflayer(&self, aq: &Aquifer, grid: &LaplaceGrid) -> DMatrix<Complex64> {
        let dis = self.dischargeinf(aq, grid);
        let naq = aq.naq();
        let np = grid.np();
        let nparam = self.nparam();
        let layers = self.layers();
        let mut rv = DMatrix::zeros(nparam, np);
        for k in 0..np {
            let eig = &aq.basis.modes[k].eigvec;
            for i in 0..nparam {
                let mut acc = Complex64::new(0.0, 0.0);
                for mode in 0..naq {
                    acc += eig[(layers[i], mode)] * dis[i][(mode, k)];
                }
                rv[(i, k)] = acc;
            }
        }
        rv
    }
}
