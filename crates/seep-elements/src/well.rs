//! Point-source wells.
//!
//! The Laplace-domain influence of a well screened in layer `l` is, per mode
//! `i`, `-1/(2 pi) * (lab/rw)/K1(rw/lab) * K0(r/lab)` scaled by the modal
//! projection of a unit source in `l` and by the flow factor (1/p for a step
//! discharge, 1 for the impulse basis of the storage wells). The K1 factor
//! makes the discharge through the borehole wall exactly the prescribed
//! strength rather than the point-sink limit.

use nalgebra::DMatrix;
use num_complex::Complex64;
use seep_core::{Aquifer, LaplaceGrid};
use seep_special::{besselk0, besselk1};

use crate::element::{
    DischargeSchedule, Element, EquationBlock, EquationContext, Influence,
};
use crate::equations::{head_rows, hconn_rows, mscreen_rows, storage_rows};
use crate::error::{Error, Result};

/// Truncation radius in decay lengths beyond which K0 is treated as zero.
const RZERO_DEFAULT: f64 = 20.0;

/// Boundary condition attached to a well.
#[derive(Debug, Clone)]
enum WellCondition {
    /// Prescribed discharge per screened layer; no unknowns.
    Discharge,
    /// Prescribed head per screened layer.
    Head(Vec<f64>),
    /// Prescribed head behind an entry resistance.
    Resistance { h: Vec<f64>, c: f64 },
    /// Uniform unknown head, prescribed total discharge.
    Mscreen { qtot: f64 },
    /// Multi-screen with per-layer entry resistance.
    MscreenRes { qtot: f64, c: f64 },
    /// Unit-step multi-screen response scaled by a discharge schedule.
    VdisMscreen,
    /// Multi-screen with wellbore storage, step discharge.
    InternalStorage { qtot: f64, rc: f64, res: f64 },
    /// Multi-screen with wellbore storage, instantaneous slug.
    InternalStorageSlug { qtot: f64, rc: f64, res: f64 },
    /// Layer connector: zero net discharge across the screens.
    Hconn { res: Vec<f64> },
}

/// A well at `(xw, yw)` with radius `rw`, screened in one or more layers.
pub struct Well {
    name: &'static str,
    xw: f64,
    yw: f64,
    rw: f64,
    q: Vec<f64>,
    layers: Vec<usize>,
    rzero: f64,
    condition: WellCondition,
    parameters: DMatrix<Complex64>,
    coef: Vec<DMatrix<Complex64>>,
    laboverrwk1: DMatrix<Complex64>,
    flowcoef: Vec<Complex64>,
    control: (f64, f64),
    pc: Vec<f64>,
    resfac: Vec<f64>,
    schedule: Option<DischargeSchedule>,
}

fn broadcast(vals: &[f64], n: usize) -> Vec<f64> {
    if vals.len() == 1 && n > 1 {
        vec![vals[0]; n]
    } else {
        vals.to_vec()
    }
}

impl Well {
    fn base(
        name: &'static str,
        xw: f64,
        yw: f64,
        rw: f64,
        q: Vec<f64>,
        layers: Vec<usize>,
        condition: WellCondition,
    ) -> Self {
        Self {
            name,
            xw,
            yw,
            rw,
            q,
            layers,
            rzero: RZERO_DEFAULT,
            condition,
            parameters: DMatrix::zeros(0, 0),
            coef: Vec::new(),
            laboverrwk1: DMatrix::zeros(0, 0),
            flowcoef: Vec::new(),
            control: (xw + rw, yw),
            pc: Vec::new(),
            resfac: Vec::new(),
            schedule: None,
        }
    }

    /// Well with prescribed discharge `q` per screened layer (layers 0-based).
    pub fn new(xw: f64, yw: f64, rw: f64, q: &[f64], layers: &[usize]) -> Self {
        let q = broadcast(q, layers.len());
        Self::base("Well", xw, yw, rw, q, layers.to_vec(), WellCondition::Discharge)
    }

    /// Well with prescribed head per screened layer.
    pub fn head_specified(xw: f64, yw: f64, rw: f64, h: &[f64], layers: &[usize]) -> Self {
        let h = broadcast(h, layers.len());
        let q = vec![0.0; layers.len()];
        Self::base("HeadWell", xw, yw, rw, q, layers.to_vec(), WellCondition::Head(h))
    }

    /// Well with prescribed head behind an entry resistance `c`.
    pub fn resistance(xw: f64, yw: f64, rw: f64, h: &[f64], c: f64, layers: &[usize]) -> Self {
        let h = broadcast(h, layers.len());
        let q = vec![0.0; layers.len()];
        Self::base(
            "ResistanceWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::Resistance { h, c },
        )
    }

    /// Multi-screen well with total discharge `qtot` and a uniform unknown head.
    pub fn mscreen(xw: f64, yw: f64, rw: f64, qtot: f64, layers: &[usize]) -> Self {
        let q = vec![0.0; layers.len()];
        Self::base(
            "MscreenWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::Mscreen { qtot },
        )
    }

    /// Multi-screen well with per-layer entry resistance `c`.
    pub fn mscreen_res(xw: f64, yw: f64, rw: f64, qtot: f64, c: f64, layers: &[usize]) -> Self {
        let q = vec![0.0; layers.len()];
        Self::base(
            "MscreenResWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::MscreenRes { qtot, c },
        )
    }

    /// Variable-discharge well: the rate becomes `q[k]` at time `tstart[k]`.
    ///
    /// Solved as a unit-step multi-screen well; the schedule is applied by
    /// the variable-discharge evaluators of the model.
    pub fn vdis_mscreen(xw: f64, yw: f64, rw: f64, tstart: &[f64], q: &[f64], layer: usize) -> Self {
        let mut dq = q.to_vec();
        for k in (1..dq.len()).rev() {
            dq[k] -= dq[k - 1];
        }
        let mut w = Self::base(
            "VdisMscreenWell",
            xw,
            yw,
            rw,
            vec![0.0],
            vec![layer],
            WellCondition::VdisMscreen,
        );
        w.schedule = Some(DischargeSchedule {
            tstart: tstart.to_vec(),
            dq,
        });
        w
    }

    /// Multi-screen well with wellbore storage in a casing of radius `rc`
    /// and entry resistance `res`.
    pub fn internal_storage(
        xw: f64,
        yw: f64,
        rw: f64,
        qtot: f64,
        layers: &[usize],
        rc: f64,
        res: f64,
    ) -> Self {
        let q = vec![0.0; layers.len()];
        Self::base(
            "InternalStorageWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::InternalStorage { qtot, rc, res },
        )
    }

    /// Wellbore-storage well for an instantaneous slug of volume `qtot`.
    pub fn internal_storage_slug(
        xw: f64,
        yw: f64,
        rw: f64,
        qtot: f64,
        layers: &[usize],
        rc: f64,
        res: f64,
    ) -> Self {
        let q = vec![0.0; layers.len()];
        Self::base(
            "InternalStorageSlugWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::InternalStorageSlug { qtot, rc, res },
        )
    }

    /// Layer connector with zero net discharge and connector resistances
    /// `res` between adjacent screens.
    pub fn hconn(xw: f64, yw: f64, rw: f64, res: &[f64], layers: &[usize]) -> Self {
        let q = vec![0.0; layers.len()];
        let res = if res.len() == 1 && layers.len() > 2 {
            vec![res[0]; layers.len() - 1]
        } else {
            res.to_vec()
        };
        Self::base(
            "HconnWell",
            xw,
            yw,
            rw,
            q,
            layers.to_vec(),
            WellCondition::Hconn { res },
        )
    }

    /// Override the truncation radius (in decay lengths).
    pub fn with_rzero(mut self, rzero: f64) -> Self {
        self.rzero = rzero;
        self
    }
}

impl Element for Well {
    fn name(&self) -> &str {
        self.name
    }

    fn nparam(&self) -> usize {
        self.layers.len()
    }

    fn nunknowns(&self) -> usize {
        match self.condition {
            WellCondition::Discharge => 0,
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
        match &self.condition {
            WellCondition::VdisMscreen if nparam != 1 => {
                return Err(Error::SingleLayer("VdisMscreenWell"));
            }
            WellCondition::Hconn { res } if res.len() != nparam - 1 => {
                return Err(Error::LengthMismatch {
                    name: "res",
                    expected: nparam - 1,
                    actual: res.len(),
                });
            }
            _ => {}
        }

        self.parameters = DMatrix::zeros(nparam, np);
        if matches!(self.condition, WellCondition::Discharge) {
            for i in 0..nparam {
                for k in 0..np {
                    self.parameters[(i, k)] = Complex64::new(self.q[i], 0.0);
                }
            }
        }

        self.flowcoef = match self.condition {
            WellCondition::InternalStorage { .. } | WellCondition::InternalStorageSlug { .. } => {
                vec![Complex64::new(1.0, 0.0); np]
            }
            _ => grid.p.iter().map(|&p| Complex64::new(1.0, 0.0) / p).collect(),
        };

        self.coef = (0..nparam)
            .map(|i| {
                DMatrix::from_fn(naq, np, |mode, k| aq.basis.modes[k].coef[(mode, self.layers[i])])
            })
            .collect();

        self.laboverrwk1 = DMatrix::from_fn(naq, np, |i, k| {
            let lab = aq.lab(i, k);
            lab / (self.rw * besselk1(self.rw / lab))
        });

        let t = &aq.data.t;
        let haq = &aq.data.haq;
        self.pc = match &self.condition {
            WellCondition::Head(h) | WellCondition::Resistance { h, .. } => h
                .iter()
                .zip(&self.layers)
                .map(|(&hi, &l)| hi * t[l])
                .collect(),
            _ => Vec::new(),
        };
        self.resfac = match &self.condition {
            WellCondition::Resistance { c, .. } | WellCondition::MscreenRes { c, .. } => self
                .layers
                .iter()
                .map(|&l| c * t[l] * haq[l] / (2.0 * std::f64::consts::PI * self.rw))
                .collect(),
            WellCondition::InternalStorage { res, .. }
            | WellCondition::InternalStorageSlug { res, .. } => self
                .layers
                .iter()
                .map(|&l| res * t[l] * haq[l] / (2.0 * std::f64::consts::PI * self.rw))
                .collect(),
            _ => Vec::new(),
        };
        Ok(())
    }

    fn potinf(&self, x: f64, y: f64, aq: &Aquifer, grid: &LaplaceGrid) -> Influence {
        let naq = aq.naq();
        let np = grid.np();
        let npin = grid.npin;
        let nparam = self.layers.len();
        let mut rv = vec![DMatrix::zeros(naq, np); nparam];
        let r = ((x - self.xw).powi(2) + (y - self.yw).powi(2))
            .sqrt()
            .max(self.rw); // inside the borehole the head is the borehole head
        for i in 0..naq {
            for n in 0..grid.nin {
                let lab0 = aq.lab(i, n * npin);
                if r / lab0.norm() >= self.rzero {
                    continue;
                }
                for j in 0..npin {
                    let k = n * npin + j;
                    let lab = aq.lab(i, k);
                    let base = -1.0 / (2.0 * std::f64::consts::PI)
                        * self.laboverrwk1[(i, k)]
                        * self.flowcoef[k]
                        * besselk0(r / lab);
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
                DMatrix::from_fn(naq, np, |i, k| self.flowcoef[k] * self.coef[param][(i, k)])
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
            WellCondition::Discharge => None,
            WellCondition::Head(_) => {
                Some(head_rows(ctx, xc, yc, &self.layers, &self.pc, None))
            }
            WellCondition::Resistance { .. } => {
                Some(head_rows(ctx, xc, yc, &self.layers, &self.pc, Some(&self.resfac)))
            }
            WellCondition::Mscreen { qtot } => {
                Some(mscreen_rows(ctx, xc, yc, &self.layers, *qtot, None))
            }
            WellCondition::VdisMscreen => {
                Some(mscreen_rows(ctx, xc, yc, &self.layers, 1.0, None))
            }
            WellCondition::MscreenRes { qtot, .. } => {
                Some(mscreen_rows(ctx, xc, yc, &self.layers, *qtot, Some(&self.resfac)))
            }
            WellCondition::InternalStorage { qtot, rc, res } => Some(storage_rows(
                ctx, xc, yc, &self.layers, *qtot, *rc, self.rw, *res, false,
            )),
            WellCondition::InternalStorageSlug { qtot, rc, res } => Some(storage_rows(
                ctx, xc, yc, &self.layers, *qtot, *rc, self.rw, *res, true,
            )),
            WellCondition::Hconn { res } => Some(hconn_rows(ctx, xc, yc, &self.layers, res)),
        }
    }

    fn control_point(&self) -> Option<(f64, f64)> {
        Some(self.control)
    }

    fn location(&self) -> Option<(f64, f64)> {
        Some((self.xw, self.yw))
    }

    fn schedule(&self) -> Option<&DischargeSchedule> {
        self.schedule.as_ref()
    }

    fn resistance_factor(&self) -> Option<&[f64]> {
        if self.resfac.is_empty() {
            None
        } else {
            Some(&self.resfac)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seep_core::{AquiferData, TopBoundary};

    fn fixture() -> (Aquifer, LaplaceGrid) {
        let data = AquiferData::new(
            vec![10.0],
            vec![10.0],
            vec![f64::NAN],
            vec![1e-4],
            vec![f64::NAN],
            TopBoundary::Impermeable,
        )
        .unwrap();
        let grid = LaplaceGrid::new(1.0, 10.0, 5).unwrap();
        let aq = Aquifer::new(data, &grid).unwrap();
        (aq, grid)
    }

    #[test]
    fn test_discharge_broadcast() {
        let w = Well::new(0.0, 0.0, 0.1, &[5.0], &[0, 1]);
        assert_eq!(w.q, vec![5.0, 5.0]);
        assert_eq!(w.nunknowns(), 0);
        assert_eq!(w.nparam(), 2);
    }

    #[test]
    fn test_step_well_strength_is_one_over_p() {
        let (aq, grid) = fixture();
        let mut w = Well::new(0.0, 0.0, 0.1, &[100.0], &[0]);
        w.initialize(&aq, &grid).unwrap();
        let s = w.strengthinflayer(&aq, &grid);
        for k in 0..grid.np() {
            let expected = Complex64::new(1.0, 0.0) / grid.p[k];
            assert!(
                (s[(0, k)] - expected).norm() < 1e-12 * expected.norm(),
                "strength influence at parameter {} is {}",
                k,
                s[(0, k)]
            );
        }
    }

    #[test]
    fn test_potinf_clipped_far_away() {
        let (aq, grid) = fixture();
        let mut w = Well::new(0.0, 0.0, 0.1, &[100.0], &[0]);
        w.initialize(&aq, &grid).unwrap();
        // decay lengths here are ~sqrt(D/p); 1e9 m is far beyond 20 of them
        let inf = w.potinf(1e9, 0.0, &aq, &grid);
        for k in 0..grid.np() {
            assert_eq!(inf[0][(0, k)], Complex64::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_head_clamped_inside_borehole() {
        let (aq, grid) = fixture();
        let mut w = Well::new(0.0, 0.0, 0.1, &[100.0], &[0]);
        w.initialize(&aq, &grid).unwrap();
        let at_center = w.potinf(0.0, 0.0, &aq, &grid);
        let at_wall = w.potinf(0.1, 0.0, &aq, &grid);
        for k in 0..grid.np() {
            assert_eq!(at_center[0][(0, k)], at_wall[0][(0, k)]);
        }
    }

    #[test]
    fn test_layer_out_of_range() {
        let (aq, grid) = fixture();
        let mut w = Well::new(0.0, 0.0, 0.1, &[1.0], &[3]);
        assert!(matches!(
            w.initialize(&aq, &grid),
            Err(Error::LayerIndex { layer: 3, naq: 1 })
        ));
    }

    #[test]
    fn test_vdis_schedule_increments() {
        let w = Well::vdis_mscreen(0.0, 0.0, 0.1, &[0.0, 1.0, 4.0], &[2.0, 5.0, 0.0], 0);
        let s = w.schedule().unwrap();
        assert_eq!(s.tstart, vec![0.0, 1.0, 4.0]);
        assert_eq!(s.dq, vec![2.0, 3.0, -5.0]);
    }
}
