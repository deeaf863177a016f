//! Model builders: raw layer input to processed aquifer data.
//!
//! The builders accept the hydraulic description the way field data comes:
//! elevations of layer interfaces, conductivities and specific storages.
//! They derive thicknesses, thickness-scaled storativities and (for the
//! quasi-3D variant) inter-layer resistances, validate the shapes against
//! the top-boundary variant, and hand the processed arrays to the core.

use seep_core::{AquiferData, Error as CoreError, TopBoundary};

use crate::error::Result;
use crate::model::Model;

/// Configuration of a multi-aquifer system: aquifers separated by explicit
/// aquitards with given resistances.
///
/// `z` holds the interface elevations, top down: `2 * naq` values for an
/// impermeable top (aquifer top/bottom pairs), `2 * naq + 1` values when an
/// aquitard caps the system. Storativities are specific storages and are
/// scaled by the layer thicknesses here.
#[derive(Debug, Clone)]
pub struct MaqConfig {
    /// Horizontal conductivity per aquifer.
    pub kaq: Vec<f64>,
    /// Interface elevations, descending.
    pub z: Vec<f64>,
    /// Aquitard resistances, top down.
    pub c: Vec<f64>,
    /// Specific storage per aquifer.
    pub saq: Vec<f64>,
    /// Specific storage per aquitard.
    pub sll: Vec<f64>,
    /// Top-boundary token: `imp`, `lea` or `sem` (prefix match).
    pub topboundary: String,
    /// Treat the top layer as phreatic: its storage is not thickness-scaled.
    pub phreatictop: bool,
    /// Start of the time window.
    pub tmin: f64,
    /// End of the time window.
    pub tmax: f64,
    /// Fourier-series half-length of the inversion.
    pub m: usize,
}

impl Default for MaqConfig {
    fn default() -> Self {
        Self {
            kaq: vec![1.0],
            z: vec![1.0, 0.0],
            c: Vec::new(),
            saq: vec![0.001],
            sll: Vec::new(),
            topboundary: "imp".to_string(),
            phreatictop: false,
            tmin: 1.0,
            tmax: 10.0,
            m: 20,
        }
    }
}

/// Configuration of a vertically discretized (quasi-3D) system: every layer
/// is an aquifer and the aquitard resistances are derived from the layer
/// half-thicknesses and the vertical anisotropy `kzoverkh`.
#[derive(Debug, Clone)]
pub struct Quasi3dConfig {
    /// Horizontal conductivity per layer.
    pub kaq: Vec<f64>,
    /// Interface elevations, descending, one more than the layer count.
    pub z: Vec<f64>,
    /// Specific storage per layer.
    pub saq: Vec<f64>,
    /// Vertical over horizontal conductivity per layer; a single value is
    /// broadcast.
    pub kzoverkh: Vec<f64>,
    /// Treat the top layer as phreatic.
    pub phreatictop: bool,
    /// Start of the time window.
    pub tmin: f64,
    /// End of the time window.
    pub tmax: f64,
    /// Fourier-series half-length of the inversion.
    pub m: usize,
}

impl Default for Quasi3dConfig {
    fn default() -> Self {
        Self {
            kaq: vec![1.0, 1.0, 1.0],
            z: vec![4.0, 3.0, 2.0, 1.0],
            saq: vec![0.3, 0.001, 0.001],
            kzoverkh: vec![0.1],
            phreatictop: true,
            tmin: 1.0,
            tmax: 10.0,
            m: 20,
        }
    }
}

fn expect_len(name: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(CoreError::LengthMismatch {
            name,
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}

fn thicknesses(z: &[f64]) -> Result<Vec<f64>> {
    let h: Vec<f64> = z.windows(2).map(|w| w[0] - w[1]).collect();
    for (i, &hi) in h.iter().enumerate() {
        if hi < 0.0 {
            return Err(CoreError::NegativeThickness(i, i + 1).into());
        }
    }
    Ok(h)
}

impl Model {
    /// Build a multi-aquifer model from a [`MaqConfig`].
    pub fn maq(cfg: &MaqConfig) -> Result<Model> {
        let top = TopBoundary::parse(&cfg.topboundary)?;
        let naq = cfg.kaq.len();
        if naq == 0 {
            return Err(CoreError::LengthMismatch {
                name: "kaq",
                expected: 1,
                actual: 0,
            }
            .into());
        }

        let data = if top == TopBoundary::Impermeable {
            expect_len("z", cfg.z.len(), 2 * naq)?;
            expect_len("c", cfg.c.len(), naq - 1)?;
            expect_len("Saq", cfg.saq.len(), naq)?;
            expect_len("Sll", cfg.sll.len(), naq - 1)?;
            let h = thicknesses(&cfg.z)?;
            let haq: Vec<f64> = h.iter().step_by(2).copied().collect();
            let mut saq: Vec<f64> = cfg.saq.iter().zip(&haq).map(|(s, hh)| s * hh).collect();
            if cfg.phreatictop {
                saq[0] /= h[0];
            }
            let hll: Vec<f64> = h.iter().skip(1).step_by(2).copied().collect();
            let sll: Vec<f64> = std::iter::once(f64::NAN)
                .chain(cfg.sll.iter().zip(&hll).map(|(s, hh)| s * hh))
                .collect();
            let c: Vec<f64> = std::iter::once(f64::NAN)
                .chain(cfg.c.iter().copied())
                .collect();
            AquiferData::new(cfg.kaq.clone(), haq, c, saq, sll, top)?
        } else {
            expect_len("z", cfg.z.len(), 2 * naq + 1)?;
            expect_len("c", cfg.c.len(), naq)?;
            expect_len("Saq", cfg.saq.len(), naq)?;
            expect_len("Sll", cfg.sll.len(), naq)?;
            let h = thicknesses(&cfg.z)?;
            let haq: Vec<f64> = h.iter().skip(1).step_by(2).copied().collect();
            let saq: Vec<f64> = cfg.saq.iter().zip(&haq).map(|(s, hh)| s * hh).collect();
            let hll: Vec<f64> = h.iter().step_by(2).copied().collect();
            let mut sll: Vec<f64> = cfg.sll.iter().zip(&hll).map(|(s, hh)| s * hh).collect();
            if cfg.phreatictop && top == TopBoundary::Leaky {
                sll[0] /= h[0];
            }
            AquiferData::new(cfg.kaq.clone(), haq, cfg.c.clone(), saq, sll, top)?
        };

        Model::new(data, cfg.tmin, cfg.tmax, cfg.m)
    }

    /// Build a quasi-3D model from a [`Quasi3dConfig`].
    pub fn quasi3d(cfg: &Quasi3dConfig) -> Result<Model> {
        let naq = cfg.kaq.len();
        if naq == 0 {
            return Err(CoreError::LengthMismatch {
                name: "kaq",
                expected: 1,
                actual: 0,
            }
            .into());
        }
        expect_len("z", cfg.z.len(), naq + 1)?;
        expect_len("Saq", cfg.saq.len(), naq)?;
        let kz: Vec<f64> = if cfg.kzoverkh.len() == 1 {
            vec![cfg.kzoverkh[0]; naq]
        } else {
            expect_len("kzoverkh", cfg.kzoverkh.len(), naq)?;
            cfg.kzoverkh.clone()
        };
        let h = thicknesses(&cfg.z)?;

        // resistance between adjacent layers from the half-thicknesses
        let mut c = vec![f64::NAN];
        for i in 1..naq {
            c.push(
                0.5 * h[i - 1] / (kz[i - 1] * cfg.kaq[i - 1]) + 0.5 * h[i] / (kz[i] * cfg.kaq[i]),
            );
        }
        let mut saq: Vec<f64> = cfg.saq.iter().zip(&h).map(|(s, hh)| s * hh).collect();
        if cfg.phreatictop {
            saq[0] /= h[0];
        }
        let sll = vec![1e-20; naq];

        let data = AquiferData::new(
            cfg.kaq.clone(),
            h,
            c,
            saq,
            sll,
            TopBoundary::Impermeable,
        )?;
        Model::new(data, cfg.tmin, cfg.tmax, cfg.m)
    }
}
