//! The transient multi-aquifer model: element registry, solve, evaluation.

use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;
use seep_core::{Aquifer, AquiferData, LaplaceGrid};
use seep_elements::Element;
use seep_solver::solve_system;
use seep_special::dehoog;

use crate::error::{Error, Result};

/// Magnitude below which a sample block is not inverted.
const INVERT_FLOOR: f64 = 1e-20;

/// Handle to a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementId(pub usize);

/// A layered aquifer system with registered elements, solved in the Laplace
/// domain and evaluated in the time domain.
///
/// The Laplace grid and the modal basis are fixed at construction; `solve`
/// initializes the elements, assembles the boundary-condition system and
/// fills the element strengths. Every evaluation call requires a prior
/// `solve` (which is a cheap no-op when no element has unknowns).
pub struct Model {
    /// The aquifer system with its modal basis.
    pub aquifer: Aquifer,
    /// The Laplace-parameter grid.
    pub grid: LaplaceGrid,
    elements: Vec<Box<dyn Element>>,
    neq: usize,
    solved: bool,
}

impl Model {
    /// Build a model from processed aquifer data and a time window.
    pub fn new(data: AquiferData, tmin: f64, tmax: f64, m: usize) -> Result<Self> {
        let grid = LaplaceGrid::new(tmin, tmax, m)?;
        let aquifer = Aquifer::new(data, &grid)?;
        Ok(Self {
            aquifer,
            grid,
            elements: Vec::new(),
            neq: 0,
            solved: false,
        })
    }

    /// Register an element.
    pub fn add<E: Element + 'static>(&mut self, element: E) -> ElementId {
        self.add_element(Box::new(element))
    }

    /// Register a boxed element.
    pub fn add_element(&mut self, element: Box<dyn Element>) -> ElementId {
        self.solved = false;
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    /// Access a registered element.
    pub fn element(&self, id: ElementId) -> Result<&dyn Element> {
        self.elements
            .get(id.0)
            .map(|e| e.as_ref())
            .ok_or(Error::UnknownElement(id.0))
    }

    /// Number of unknowns of the last solve.
    pub fn neq(&self) -> usize {
        self.neq
    }

    /// Initialize all elements, assemble and solve the boundary-condition
    /// system, and store the element strengths.
    pub fn solve(&mut self) -> Result<()> {
        for e in self.elements.iter_mut() {
            e.initialize(&self.aquifer, &self.grid)?;
        }
        self.neq = solve_system(&mut self.elements, &self.aquifer, &self.grid)?;
        self.solved = true;
        log::debug!("model solved with {} unknowns", self.neq);
        Ok(())
    }

    fn ensure_solved(&self) -> Result<()> {
        if self.solved {
            Ok(())
        } else {
            Err(Error::NotSolved)
        }
    }

    fn warn_outside_window(&self, t: &[f64]) {
        if let (Some(first), Some(last)) = (t.first(), t.last()) {
            if *first < self.grid.tmin || *last > self.grid.tmax {
                log::warn!(
                    "some times fall outside [{}, {}]; zeros are substituted",
                    self.grid.tmin,
                    self.grid.tmax
                );
            }
        }
    }

    /// Project a modal tensor onto physical layers, per Laplace parameter.
    fn project_layers(&self, modal: &DMatrix<Complex64>) -> DMatrix<Complex64> {
        let naq = self.aquifer.naq();
        let np = self.grid.np();
        let mut rv = DMatrix::zeros(naq, np);
        for k in 0..np {
            let eig = &self.aquifer.basis.modes[k].eigvec;
            for l in 0..naq {
                let mut acc = Complex64::new(0.0, 0.0);
                for mode in 0..naq {
                    acc += eig[(l, mode)] * modal[(mode, k)];
                }
                rv[(l, k)] = acc;
            }
        }
        rv
    }

    fn phi_unchecked(&self, x: f64, y: f64) -> DMatrix<Complex64> {
        let naq = self.aquifer.naq();
        let np = self.grid.np();
        let mut modal = DMatrix::zeros(naq, np);
        for e in &self.elements {
            modal += e.potential(x, y, &self.aquifer, &self.grid);
        }
        self.project_layers(&modal)
    }

    /// Laplace-domain potentials per aquifer, `naq x np`.
    pub fn phi(&self, x: f64, y: f64) -> Result<DMatrix<Complex64>> {
        self.ensure_solved()?;
        Ok(self.phi_unchecked(x, y))
    }

    /// Laplace-domain heads per aquifer, `naq x np`.
    pub fn phi_head(&self, x: f64, y: f64) -> Result<DMatrix<Complex64>> {
        let mut phi = self.phi(x, y)?;
        for l in 0..self.aquifer.naq() {
            let t = self.aquifer.data.t[l];
            for k in 0..self.grid.np() {
                phi[(l, k)] /= t;
            }
        }
        Ok(phi)
    }

    /// Invert one row of Laplace samples at the requested times.
    ///
    /// All gating lives here so that pointwise, line and grid evaluation
    /// agree exactly: a block is skipped when its first sample is negligible
    /// or when any sample is exactly zero, and times outside the window stay
    /// zero.
    fn invert_row(&self, samples: &[Complex64], t: &[f64]) -> Vec<f64> {
        let npin = self.grid.npin;
        let mut rv = vec![0.0; t.len()];
        for n in 0..self.grid.nin {
            let block = &samples[n * npin..(n + 1) * npin];
            let mut idxs = Vec::new();
            let mut ts = Vec::new();
            for (i, &tt) in t.iter().enumerate() {
                if tt >= self.grid.tmin && self.grid.interval_of(tt) == Some(n) {
                    idxs.push(i);
                    ts.push(tt);
                }
            }
            if ts.is_empty() || block[0].norm() <= INVERT_FLOOR {
                continue;
            }
            if block.iter().any(|v| v.re == 0.0 && v.im == 0.0) {
                continue;
            }
            let vals = dehoog(
                &ts,
                self.grid.tintervals[n + 1],
                block,
                self.grid.gamma[n],
                self.grid.m,
            );
            for (i, v) in idxs.into_iter().zip(vals) {
                rv[i] = v;
            }
        }
        rv
    }

    fn invert_matrix_rows(&self, rows: &DMatrix<Complex64>, t: &[f64]) -> DMatrix<f64> {
        let np = self.grid.np();
        let mut rv = DMatrix::zeros(rows.nrows(), t.len());
        for l in 0..rows.nrows() {
            let samples: Vec<Complex64> = (0..np).map(|k| rows[(l, k)]).collect();
            let vals = self.invert_row(&samples, t);
            for (j, v) in vals.into_iter().enumerate() {
                rv[(l, j)] = v;
            }
        }
        rv
    }

    /// Potentials per aquifer at the requested (ascending) times,
    /// `naq x t.len()`.
    pub fn potential(&self, x: f64, y: f64, t: &[f64]) -> Result<DMatrix<f64>> {
        self.ensure_solved()?;
        self.warn_outside_window(t);
        let phi = self.phi_unchecked(x, y);
        Ok(self.invert_matrix_rows(&phi, t))
    }

    /// Heads per aquifer at the requested (ascending) times, `naq x t.len()`.
    pub fn head(&self, x: f64, y: f64, t: &[f64]) -> Result<DMatrix<f64>> {
        let mut pot = self.potential(x, y, t)?;
        for l in 0..self.aquifer.naq() {
            let tl = self.aquifer.data.t[l];
            for j in 0..t.len() {
                pot[(l, j)] /= tl;
            }
        }
        Ok(pot)
    }

    /// Heads along a polyline of points; `y` may hold a single value to be
    /// used for all `x`. Returns one `t.len() x x.len()` matrix per aquifer.
    pub fn head_along_line(&self, x: &[f64], y: &[f64], t: &[f64]) -> Result<Vec<DMatrix<f64>>> {
        self.ensure_solved()?;
        let yg: Vec<f64> = if y.len() == 1 {
            vec![y[0]; x.len()]
        } else {
            y.to_vec()
        };
        if yg.len() != x.len() {
            return Err(seep_core::Error::LengthMismatch {
                name: "y",
                expected: x.len(),
                actual: y.len(),
            }
            .into());
        }
        let points: Vec<(f64, f64)> = x.iter().copied().zip(yg).collect();
        let heads: Vec<DMatrix<f64>> = points
            .par_iter()
            .map(|&(px, py)| self.head(px, py, t))
            .collect::<Result<_>>()?;

        let naq = self.aquifer.naq();
        let mut rv = vec![DMatrix::zeros(t.len(), x.len()); naq];
        for (i, h) in heads.iter().enumerate() {
            for l in 0..naq {
                for j in 0..t.len() {
                    rv[l][(j, i)] = h[(l, j)];
                }
            }
        }
        Ok(rv)
    }

    /// Heads on a rectangular grid. Returns `rv[aquifer][time]` as
    /// `ny x nx` matrices; identical to pointwise `head` at the grid nodes.
    #[allow(clippy::too_many_arguments)]
    pub fn head_grid(
        &self,
        x1: f64,
        x2: f64,
        nx: usize,
        y1: f64,
        y2: f64,
        ny: usize,
        t: &[f64],
    ) -> Result<Vec<Vec<DMatrix<f64>>>> {
        self.ensure_solved()?;
        let xs = linspace(x1, x2, nx);
        let ys = linspace(y1, y2, ny);
        let points: Vec<(f64, f64)> = ys
            .iter()
            .flat_map(|&py| xs.iter().map(move |&px| (px, py)))
            .collect();
        let heads: Vec<DMatrix<f64>> = points
            .par_iter()
            .map(|&(px, py)| self.head(px, py, t))
            .collect::<Result<_>>()?;

        let naq = self.aquifer.naq();
        let mut rv = vec![vec![DMatrix::zeros(ny, nx); t.len()]; naq];
        for (idx, h) in heads.iter().enumerate() {
            let (iy, ix) = (idx / nx, idx % nx);
            for l in 0..naq {
                for j in 0..t.len() {
                    rv[l][j][(iy, ix)] = h[(l, j)];
                }
            }
        }
        Ok(rv)
    }

    /// Heads from variable-discharge elements by superposition of shifted
    /// unit step responses. Every element must carry a discharge schedule.
    pub fn vdis_head_wells(&self, x: f64, y: f64, t: &[f64]) -> Result<DMatrix<f64>> {
        self.ensure_solved()?;
        self.warn_outside_window(t);
        let naq = self.aquifer.naq();
        let mut rv = DMatrix::<f64>::zeros(naq, t.len());
        for e in &self.elements {
            let sched = e
                .schedule()
                .ok_or_else(|| Error::NotVariable(e.name().to_string()))?;
            let layer_pot =
                self.project_layers(&e.potential(x, y, &self.aquifer, &self.grid));
            self.superpose_schedule(&layer_pot, sched.tstart.as_slice(), &sched.dq, t, &mut rv);
        }
        self.to_heads(rv)
    }

    /// Variable-discharge heads using the first schedule found for the whole
    /// superposed field.
    ///
    /// Retained for single-element models; with several elements the
    /// breakpoints of the first variable element are applied to all
    /// contributions, so prefer [`Model::vdis_head_wells`].
    pub fn vdis_head(&self, x: f64, y: f64, t: &[f64]) -> Result<DMatrix<f64>> {
        self.ensure_solved()?;
        self.warn_outside_window(t);
        let sched = self
            .elements
            .iter()
            .find_map(|e| e.schedule())
            .ok_or(Error::NoSchedule)?;
        let layer_pot = self.phi_unchecked(x, y);
        let naq = self.aquifer.naq();
        let mut rv = DMatrix::<f64>::zeros(naq, t.len());
        self.superpose_schedule(&layer_pot, &sched.tstart, &sched.dq, t, &mut rv);
        self.to_heads(rv)
    }

    fn superpose_schedule(
        &self,
        layer_pot: &DMatrix<Complex64>,
        tstart: &[f64],
        dq: &[f64],
        t: &[f64],
        rv: &mut DMatrix<f64>,
    ) {
        let np = self.grid.np();
        for (&ts, &dqk) in tstart.iter().zip(dq) {
            let shifted: Vec<f64> = t.iter().map(|&tt| tt - ts).collect();
            for l in 0..layer_pot.nrows() {
                let samples: Vec<Complex64> = (0..np).map(|k| layer_pot[(l, k)]).collect();
                let vals = self.invert_row(&samples, &shifted);
                for (j, v) in vals.into_iter().enumerate() {
                    rv[(l, j)] += dqk * v;
                }
            }
        }
    }

    fn to_heads(&self, mut pot: DMatrix<f64>) -> Result<DMatrix<f64>> {
        for l in 0..self.aquifer.naq() {
            let tl = self.aquifer.data.t[l];
            for j in 0..pot.ncols() {
                pot[(l, j)] /= tl;
            }
        }
        Ok(pot)
    }

    /// Per-layer discharges of an element at the requested times; rows other
    /// than the element's screened layers stay zero.
    pub fn strength(&self, id: ElementId, t: &[f64]) -> Result<DMatrix<f64>> {
        self.ensure_solved()?;
        self.warn_outside_window(t);
        let e = self.element(id)?;
        let dis = e.dischargeinf(&self.aquifer, &self.grid);
        let params = e.parameters();
        let naq = self.aquifer.naq();
        let np = self.grid.np();
        let mut modal = DMatrix::<Complex64>::zeros(naq, np);
        for i in 0..e.nparam() {
            for k in 0..np {
                let s = params[(i, k)];
                for mode in 0..naq {
                    modal[(mode, k)] += s * dis[i][(mode, k)];
                }
            }
        }
        let layer = self.project_layers(&modal);
        let mut rv = DMatrix::zeros(naq, t.len());
        for &l in e.layers() {
            let samples: Vec<Complex64> = (0..np).map(|k| layer[(l, k)]).collect();
            let vals = self.invert_row(&samples, t);
            for (j, v) in vals.into_iter().enumerate() {
                rv[(l, j)] = v;
            }
        }
        Ok(rv)
    }

    /// Head inside the borehole of an element, per screened layer: the
    /// aquifer head minus the entry-resistance head loss where the element
    /// carries one.
    pub fn head_inside(&self, id: ElementId, t: &[f64]) -> Result<DMatrix<f64>> {
        self.ensure_solved()?;
        let e = self.element(id)?;
        let (xw, yw) = e
            .location()
            .ok_or_else(|| Error::NoLocation(e.name().to_string()))?;
        let h = self.head(xw, yw, t)?;
        let layers = e.layers().to_vec();
        let mut rv = DMatrix::zeros(layers.len(), t.len());
        for (r, &l) in layers.iter().enumerate() {
            for j in 0..t.len() {
                rv[(r, j)] = h[(l, j)];
            }
        }
        if let Some(rf) = e.resistance_factor() {
            let s = self.strength(id, t)?;
            for (r, &l) in layers.iter().enumerate() {
                let tl = self.aquifer.data.t[l];
                for j in 0..t.len() {
                    rv[(r, j)] -= rf[r] / tl * s[(l, j)];
                }
            }
        }
        Ok(rv)
    }
}

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![a];
    }
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}
