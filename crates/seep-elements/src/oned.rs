//! One-dimensional strips: uniform flow in x released at x = 0.
//!
//! The strip either extends to infinity on the right or reflects against an
//! impermeable boundary at `x = L`. Influences are gated the same way as the
//! radial elements: beyond 20 decay lengths the contribution is zero.

use nalgebra::DMatrix;
use num_complex::Complex64;
use seep_core::{Aquifer, LaplaceGrid};

use crate::element::{Element, EquationBlock, EquationContext, Influence};
use crate::equations::head_rows;
use crate::error::{Error, Result};

/// Gate in decay lengths beyond which the strip influence is zero.
const XZERO: f64 = 20.0;

/// Condition at the right side of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightSide {
    /// The strip extends to infinity.
    Infinite,
    /// Impermeable boundary at `x = L`; the solution reflects.
    Impermeable,
}

#[derive(Debug, Clone)]
enum OneDCondition {
    Discharge,
    Head(Vec<f64>),
}

/// A 1-D strip releasing discharge `qx` at `x = 0` into the screened layers.
pub struct OneD {
    name: &'static str,
    qx: Vec<f64>,
    layers: Vec<usize>,
    rightside: RightSide,
    l: f64,
    condition: OneDCondition,
    parameters: DMatrix<Complex64>,
    coef: Vec<DMatrix<Complex64>>,
    a_coef: DMatrix<Complex64>,
    b_coef: DMatrix<Complex64>,
    pc: Vec<f64>,
}

fn broadcast(vals: &[f64], n: usize) -> Vec<f64> {
    if vals.len() == 1 && n > 1 {
        vec![vals[0]; n]
    } else {
        vals.to_vec()
    }
}

impl OneD {
    fn base(
        name: &'static str,
        qx: Vec<f64>,
        layers: Vec<usize>,
        rightside: RightSide,
        l: f64,
        condition: OneDCondition,
    ) -> Self {
        Self {
            name,
            qx,
            layers,
            rightside,
            l,
            condition,
            parameters: DMatrix::zeros(0, 0),
            coef: Vec::new(),
            a_coef: DMatrix::zeros(0, 0),
            b_coef: DMatrix::zeros(0, 0),
            pc: Vec::new(),
        }
    }

    /// Infinite strip with prescribed discharge per screened layer.
    pub fn new(qx: &[f64], layers: &[usize]) -> Self {
        let qx = broadcast(qx, layers.len());
        Self::base(
            "OneD",
            qx,
            layers.to_vec(),
            RightSide::Infinite,
            f64::INFINITY,
            OneDCondition::Discharge,
        )
    }

    /// Strip with an impermeable right boundary at `x = l`.
    pub fn new_bounded(qx: &[f64], layers: &[usize], l: f64) -> Self {
        let qx = broadcast(qx, layers.len());
        Self::base(
            "OneD",
            qx,
            layers.to_vec(),
            RightSide::Impermeable,
            l,
            OneDCondition::Discharge,
        )
    }

    /// Infinite strip holding the head at `x = 0`.
    pub fn head_specified(h: &[f64], layers: &[usize]) -> Self {
        let h = broadcast(h, layers.len());
        let qx = vec![0.0; layers.len()];
        Self::base(
            "HeadOneD",
            qx,
            layers.to_vec(),
            RightSide::Infinite,
            f64::INFINITY,
            OneDCondition::Head(h),
        )
    }

    /// Head-specified strip with an impermeable right boundary at `x = l`.
    pub fn head_specified_bounded(h: &[f64], layers: &[usize], l: f64) -> Self {
        let h = broadcast(h, layers.len());
        let qx = vec![0.0; layers.len()];
        Self::base(
            "HeadOneD",
            qx,
            layers.to_vec(),
            RightSide::Impermeable,
            l,
            OneDCondition::Head(h),
        )
    }
}

impl Element for OneD {
    fn name(&self) -> &str {
        self.name
    }

    fn nparam(&self) -> usize {
        self.layers.len()
    }

    fn nunknowns(&self) -> usize {
        match self.condition {
            OneDCondition::Discharge => 0,
            OneDCondition::Head(_) => self.layers.len(),
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

        self.parameters = DMatrix::zeros(nparam, np);
        if matches!(self.condition, OneDCondition::Discharge) {
            for i in 0..nparam {
                for k in 0..np {
                    self.parameters[(i, k)] = Complex64::new(self.qx[i], 0.0);
                }
            }
        }
        self.coef = (0..nparam)
            .map(|i| {
                DMatrix::from_fn(naq, np, |mode, k| aq.basis.modes[k].coef[(mode, self.layers[i])])
            })
            .collect();

        if self.rightside == RightSide::Impermeable {
            self.a_coef = DMatrix::from_fn(naq, np, |i, k| {
                let lab = aq.lab(i, k);
                lab / (1.0 - (-2.0 * self.l / lab).exp())
            });
            self.b_coef = DMatrix::from_fn(naq, np, |i, k| {
                let lab = aq.lab(i, k);
                (-self.l / lab).exp() * self.a_coef[(i, k)]
            });
        }

        self.pc = match &self.condition {
            OneDCondition::Head(h) => h
                .iter()
                .zip(&self.layers)
                .map(|(&hi, &l)| hi * aq.data.t[l])
                .collect(),
            _ => Vec::new(),
        };
        Ok(())
    }

    fn potinf(&self, x: f64, _y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        let naq = aq.naq();
        let np = grid.np();
        let npin = grid.npin;
        let nparam = self.layers.len();
        let mut rv = vec![DMatrix::zeros(naq, np); nparam];
        for i in 0..naq {
            for n in 0..grid.nin {
                let lab0 = aq.lab(i, n * npin);
                if x / lab0.norm() >= XZERO {
                    continue;
                }
                for j in 0..npin {
                    let k = n * npin + j;
                    let lab = aq.lab(i, k);
                    let base = match self.rightside {
                        RightSide::Infinite => lab / grid.p[k] * (-x / lab).exp(),
                        RightSide::Impermeable => {
                            grid.p[k]
                                * (self.a_coef[(i, k)] * (-x / lab).exp()
                                    + self.b_coef[(i, k)] * ((x - self.l) / lab).exp())
                        }
                    };
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
        match &self.condition {
            OneDCondition::Discharge => None,
            OneDCondition::Head(_) => Some(head_rows(ctx, 0.0, 0.0, &self.layers, &self.pc, None)),
        }
    }

    fn control_point(&self) -> Option<(f64, f64)> {
        Some((0.0, 0.0))
    }

    fn location(&self) -> Option<(f64, f64)> {
        Some((0.0, 0.0))
    }
}
