//! Line-sinks and strings of line-sinks.
//!
//! A line-sink extracts water along a segment at a strength per unit length.
//! Its influence is the line integral of the well kernel K0 over the part of
//! the segment within the truncation disc of the evaluation point; the
//! integral itself comes from the special-function kernel, the -1/(2 pi)
//! point-sink normalization lives here.

use nalgebra::DMatrix;
use num_complex::Complex64;
use seep_core::{Aquifer, LaplaceGrid};
use seep_special::{besselk0_line, circle_line_intersection};

use crate::element::{Element, EquationBlock, EquationContext, Influence};
use crate::equations::{head_rows, hconn_rows, mscreen_rows};
use crate::error::{Error, Result};

/// Truncation radius in decay lengths for the clipping disc.
const RZERO: f64 = 20.0;

#[derive(Debug, Clone)]
enum LineSinkCondition {
    /// Prescribed strength per unit length; no unknowns.
    Discharge,
    /// Prescribed head per screened layer.
    Head(Vec<f64>),
    /// Prescribed head behind a bed resistance.
    Resistance { h: Vec<f64>, c: f64 },
    /// Uniform unknown head, prescribed total strength.
    Mscreen { stot: f64 },
    /// Layer connector with zero net strength.
    Hconn { res: Vec<f64> },
}

/// A line-sink on the segment from `(x1, y1)` to `(x2, y2)`.
pub struct LineSink {
    name: &'static str,
    sigma: Vec<f64>,
    layers: Vec<usize>,
    condition: LineSinkCondition,
    parameters: DMatrix<Complex64>,
    coef: Vec<DMatrix<Complex64>>,
    control: (f64, f64),
    z1: Complex64,
    z2: Complex64,
    pc: Vec<f64>,
    resfac: Vec<f64>,
}

fn broadcast(vals: &[f64], n: usize) -> Vec<f64> {
    if vals.len() == 1 && n > 1 {
        vec![vals[0]; n]
    } else {
        vals.to_vec()
    }
}

impl LineSink {
    fn base(
        name: &'static str,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        sigma: Vec<f64>,
        layers: Vec<usize>,
        condition: LineSinkCondition,
    ) -> Self {
        Self {
            name,
            sigma,
            layers,
            condition,
            parameters: DMatrix::zeros(0, 0),
            coef: Vec::new(),
            control: (0.5 * (x1 + x2), 0.5 * (y1 + y2)),
            z1: Complex64::new(x1, y1),
            z2: Complex64::new(x2, y2),
            pc: Vec::new(),
            resfac: Vec::new(),
        }
    }

    /// Line-sink with prescribed strength per unit length.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, sigma: &[f64], layers: &[usize]) -> Self {
        let sigma = broadcast(sigma, layers.len());
        Self::base(
            "LineSink",
            x1,
            y1,
            x2,
            y2,
            sigma,
            layers.to_vec(),
            LineSinkCondition::Discharge,
        )
    }

    /// Line-sink holding the head at its centre.
    pub fn head_specified(x1: f64, y1: f64, x2: f64, y2: f64, h: &[f64], layers: &[usize]) -> Self {
        let h = broadcast(h, layers.len());
        let sigma = vec![0.0; layers.len()];
        Self::base(
            "HeadLineSink",
            x1,
            y1,
            x2,
            y2,
            sigma,
            layers.to_vec(),
            LineSinkCondition::Head(h),
        )
    }

    /// Line-sink with a bed resistance `c` between stream and aquifer.
    pub fn resistance(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        h: &[f64],
        c: f64,
        layers: &[usize],
    ) -> Self {
        let h = broadcast(h, layers.len());
        let sigma = vec![0.0; layers.len()];
        Self::base(
            "ResistanceLineSink",
            x1,
            y1,
            x2,
            y2,
            sigma,
            layers.to_vec(),
            LineSinkCondition::Resistance { h, c },
        )
    }

    /// Multi-screen line-sink with prescribed total strength.
    pub fn mscreen(x1: f64, y1: f64, x2: f64, y2: f64, stot: f64, layers: &[usize]) -> Self {
        let sigma = vec![0.0; layers.len()];
        Self::base(
            "MscreenLineSink",
            x1,
            y1,
            x2,
            y2,
            sigma,
            layers.to_vec(),
            LineSinkCondition::Mscreen { stot },
        )
    }

    /// Layer-connecting line-sink with zero net strength.
    pub fn hconn(x1: f64, y1: f64, x2: f64, y2: f64, res: &[f64], layers: &[usize]) -> Self {
        let sigma = vec![0.0; layers.len()];
        let res = if res.len() == 1 && layers.len() > 2 {
            vec![res[0]; layers.len() - 1]
        } else {
            res.to_vec()
        };
        Self::base(
            "HconnLineSink",
            x1,
            y1,
            x2,
            y2,
            sigma,
            layers.to_vec(),
            LineSinkCondition::Hconn { res },
        )
    }
}

impl Element for LineSink {
    fn name(&self) -> &str {
        self.name
    }

    fn nparam(&self) -> usize {
        self.layers.len()
    }

    fn nunknowns(&self) -> usize {
        match self.condition {
            LineSinkCondition::Discharge => 0,
            _ => self.layers.len(),
        }
    }

    fn layers(&self) -> &[usize] {
        &self.layers
    }

    fn initialize(&mut self, aq: &Aquifer, grid: &LaplaceGrid) -> Result<()> {
        let naq = aq.naq();
        let np = grid.np();
        let nparam = self.layers.len();
        if nparam == 0 {
            return Err(Error::LengthMismatch {
                name: "layers",
                expected: 1,
                actual: 0,
            });
        }
        for &l in &self.layers {
            if l >= naq {
                return Err(Error::LayerIndex { layer: l, naq });
            }
        }
        if let LineSinkCondition::Hconn { res } = &self.condition {
            if res.len() != nparam - 1 {
                return Err(Error::LengthMismatch {
                    name: "res",
                    expected: nparam - 1,
                    actual: res.len(),
                });
            }
        }

        self.parameters = DMatrix::zeros(nparam, np);
        if matches!(self.condition, LineSinkCondition::Discharge) {
            for i in 0..nparam {
                for k in 0..np {
                    self.parameters[(i, k)] = Complex64::new(self.sigma[i], 0.0);
                }
            }
        }
        self.coef = (0..nparam)
            .map(|i| {
                DMatrix::from_fn(naq, np, |mode, k| aq.basis.modes[k].coef[(mode, self.layers[i])])
            })
            .collect();

        let t = &aq.data.t;
        let haq = &aq.data.haq;
        self.pc = match &self.condition {
            LineSinkCondition::Head(h) | LineSinkCondition::Resistance { h, .. } => h
                .iter()
                .zip(&self.layers)
                .map(|(&hi, &l)| hi * t[l])
                .collect(),
            _ => Vec::new(),
        };
        self.resfac = match &self.condition {
            LineSinkCondition::Resistance { c, .. } => {
                self.layers.iter().map(|&l| c * t[l] / haq[l]).collect()
            }
            _ => Vec::new(),
        };
        Ok(())
    }

    fn potinf(&self, x: f64, y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        let naq = aq.naq();
        let np = grid.np();
        let npin = grid.npin;
        let nparam = self.layers.len();
        let z0 = Complex64::new(x, y);
        let mut rv = vec![DMatrix::zeros(naq, np); nparam];
        let mut pot = vec![Complex64::new(0.0, 0.0); npin];
        for i in 0..naq {
            for n in 0..grid.nin {
                let radius = RZERO * aq.lab(i, n * npin).norm();
                let Some((za, zb)) = circle_line_intersection(self.z1, self.z2, z0, radius) else {
                    continue;
                };
                let labs: Vec<Complex64> =
                    (0..npin).map(|j| aq.lab(i, n * npin + j)).collect();
                besselk0_line(x, y, za, zb, &labs, &mut pot);
                for (j, &potj) in pot.iter().enumerate() {
                    let k = n * npin + j;
                    let base = -1.0 / (2.0 * std::f64::consts::PI) * potj / grid.p[k];
                    for (param, rvp) in rv.iter_mut().enumerate() {
                        rvp[(i, k)] = base * self.coef[param][(i, k)];
                    }
                }
            }
        }
        rv
    }

    fn dischargeinf(&self, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        let naq = aq.naq();
        let np = grid.np();
        (0..self.layers.len())
            .map(|param| {
                DMatrix::from_fn(naq, np, |i, k| self.coef[param][(i, k)] / grid.p[k])
            })
            .collect()
    }

    fn parameters(&self) -> &DMatrix<Complex64> {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut DMatrix<Complex64> {
        &mut self.parameters
    }

    fn equation(&self, ctx: &EquationContext<'_>) -> Option<EquationBlock> {
        let (xc, yc) = self.control;
        match &self.condition {
            LineSinkCondition::Discharge => None,
            LineSinkCondition::Head(_) => {
                Some(head_rows(ctx, xc, yc, &self.layers, &self.pc, None))
            }
            LineSinkCondition::Resistance { .. } => {
                Some(head_rows(ctx, xc, yc, &self.layers, &self.pc, Some(&self.resfac)))
            }
            LineSinkCondition::Mscreen { stot } => {
                Some(mscreen_rows(ctx, xc, yc, &self.layers, *stot, None))
            }
            LineSinkCondition::Hconn { res } => {
                Some(hconn_rows(ctx, xc, yc, &self.layers, res))
            }
        }
    }

    fn control_point(&self) -> Option<(f64, f64)> {
        Some(self.control)
    }

    fn location(&self) -> Option<(f64, f64)> {
        Some(self.control)
    }
}

/// Build a string of head-specified line-sinks along a polyline.
pub fn head_line_sink_string(xy: &[(f64, f64)], h: f64, layers: &[usize]) -> Vec<LineSink> {
    xy.windows(2)
        .map(|w| LineSink::head_specified(w[0].0, w[0].1, w[1].0, w[1].1, &[h], layers))
        .collect()
}

/// A string of contiguous line-sinks forming a ditch: uniform but unknown
/// head along the string and a prescribed total discharge.
pub struct LineSinkDitch {
    name: &'static str,
    coverw: f64,
    q: f64,
    layer: usize,
    layers: Vec<usize>,
    segments: Vec<LineSink>,
    xc: Vec<f64>,
    yc: Vec<f64>,
    parameters: DMatrix<Complex64>,
}

impl LineSinkDitch {
    /// Ditch along the polyline `xy` in `layer`, with bed resistance over
    /// width `coverw` and total discharge `q`.
    pub fn new(xy: &[(f64, f64)], coverw: f64, q: f64, layer: usize) -> Self {
        let nseg = xy.len().saturating_sub(1);
        let segments: Vec<LineSink> = xy
            .windows(2)
            .map(|w| LineSink::new(w[0].0, w[0].1, w[1].0, w[1].1, &[0.0], &[layer]))
            .collect();
        let xc = xy.windows(2).map(|w| 0.5 * (w[0].0 + w[1].0)).collect();
        let yc = xy.windows(2).map(|w| 0.5 * (w[0].1 + w[1].1)).collect();
        Self {
            name: "LineSinkDitch",
            coverw,
            q,
            layer,
            layers: vec![layer; nseg],
            segments,
            xc,
            yc,
            parameters: DMatrix::zeros(0, 0),
        }
    }
}

impl Element for LineSinkDitch {
    fn name(&self) -> &str {
        self.name
    }

    fn nparam(&self) -> usize {
        self.segments.len()
    }

    fn nunknowns(&self) -> usize {
        self.segments.len()
    }

    fn layers(&self) -> &[usize] {
        &self.layers
    }

    fn initialize(&mut self, aq: &Aquifer, grid: &LaplaceGrid) -> Result<()> {
        for seg in self.segments.iter_mut() {
            seg.initialize(aq, grid)?;
        }
        self.parameters = DMatrix::zeros(self.segments.len(), grid.np());
        Ok(())
    }

    fn potinf(&self, x: f64, y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        self.segments
            .iter()
            .map(|seg| seg.potinf(x, y, aq, grid).swap_remove(0))
            .collect()
    }

    fn dischargeinf(&self, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        self.segments
            .iter()
            .map(|seg| seg.dischargeinf(aq, grid).swap_remove(0))
            .collect()
    }

    fn parameters(&self) -> &DMatrix<Complex64> {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut DMatrix<Complex64> {
        &mut self.parameters
    }

    fn equation(&self, ctx: &EquationContext<'_>) -> Option<EquationBlock> {
        let nunk = self.nunknowns();
        let np = ctx.grid.np();
        let t = &ctx.aq.data.t;
        let mut mat = vec![DMatrix::zeros(ctx.neq, np); nunk];
        let mut rhs = DMatrix::<Complex64>::zeros(nunk, np);

        // resistance-style head rows at every segment centre
        for icp in 0..nunk {
            let mut ieq = 0;
            for (j, e) in ctx.elements.iter().enumerate() {
                let enunk = e.nunknowns();
                if enunk > 0 {
                    let pil =
                        e.potinflayer(self.xc[icp], self.yc[icp], &[self.layer], ctx.aq, ctx.grid);
                    for jj in 0..enunk {
                        for k in 0..np {
                            mat[icp][(ieq + jj, k)] = pil[0][(jj, k)];
                        }
                    }
                    if j == ctx.self_index {
                        for k in 0..np {
                            mat[icp][(ieq + icp, k)] -= t[self.layer] * self.coverw;
                        }
                    }
                    ieq += enunk;
                } else {
                    let pl =
                        e.potentiallayer(self.xc[icp], self.yc[icp], &[self.layer], ctx.aq, ctx.grid);
                    for k in 0..np {
                        rhs[(icp, k)] -= pl[(0, k)];
                    }
                }
            }
        }

        // subtract row i+1 from row i: equal heads between segments
        for icp in 0..nunk - 1 {
            let next = mat[icp + 1].clone();
            mat[icp] -= &next;
            for k in 0..np {
                let d = rhs[(icp + 1, k)];
                rhs[(icp, k)] -= d;
            }
        }

        // replace the last row with the total-discharge condition
        mat[nunk - 1].fill(Complex64::new(0.0, 0.0));
        let mut ieq = 0;
        for (j, e) in ctx.elements.iter().enumerate() {
            if j == ctx.self_index {
                let s = self.strengthinflayer(ctx.aq, ctx.grid);
                for jj in 0..nunk {
                    for k in 0..np {
                        mat[nunk - 1][(ieq + jj, k)] = s[(jj, k)];
                    }
                }
                for k in 0..np {
                    rhs[(nunk - 1, k)] = self.q / ctx.grid.p[k];
                }
            }
            ieq += e.nunknowns();
        }
        Some(EquationBlock { mat, rhs })
    }

    fn control_point(&self) -> Option<(f64, f64)> {
        self.xc.first().map(|&x| (x, self.yc[0]))
    }
}
