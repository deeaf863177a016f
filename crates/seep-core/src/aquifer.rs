//! Layered aquifer system description.

use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::laplace::LaplaceGrid;
use crate::modal::ModalBasis;

/// Aquitard storativities below this value are clamped to it.
const SLL_FLOOR: f64 = 1e-20;

/// Condition at the top of the uppermost aquitard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBoundary {
    /// No flow across the top of the system.
    Impermeable,
    /// Storage-only aquitard on top, closed above.
    Leaky,
    /// Aquitard on top with a fixed head above it.
    SemiConfined,
}

impl TopBoundary {
    /// Parse a top-boundary token; the first three letters decide.
    pub fn parse(token: &str) -> Result<Self> {
        let key: String = token.chars().take(3).collect::<String>().to_lowercase();
        match key.as_str() {
            "imp" => Ok(TopBoundary::Impermeable),
            "lea" => Ok(TopBoundary::Leaky),
            "sem" => Ok(TopBoundary::SemiConfined),
            _ => Err(Error::UnknownTopBoundary(token.to_string())),
        }
    }

    /// True when an aquitard sits on top of the first aquifer.
    pub fn has_top_aquitard(&self) -> bool {
        !matches!(self, TopBoundary::Impermeable)
    }
}

/// Hydraulic description of a stack of aquifers separated by aquitards.
///
/// All arrays have one entry per aquifer. `c[i]` and `sll[i]` describe the
/// aquitard *above* aquifer `i`; for an impermeable top `c[0]` and `sll[0]`
/// are NaN and never read.
#[derive(Debug, Clone)]
pub struct AquiferData {
    /// Horizontal conductivity per aquifer.
    pub kaq: Vec<f64>,
    /// Aquifer thickness.
    pub haq: Vec<f64>,
    /// Transmissivity `kaq * haq`.
    pub t: Vec<f64>,
    /// Aquitard resistance above each aquifer.
    pub c: Vec<f64>,
    /// Aquifer storativity.
    pub saq: Vec<f64>,
    /// Aquitard storativity above each aquifer, clamped to >= 1e-20.
    pub sll: Vec<f64>,
    /// Diffusivity `t / saq`.
    pub d: Vec<f64>,
    /// Top-boundary condition.
    pub topboundary: TopBoundary,
}

impl AquiferData {
    /// Build the layered system from per-aquifer arrays.
    ///
    /// The arrays are the processed form: thickness-scaled storativities and
    /// a leading NaN resistance for an impermeable top. The builders in the
    /// facade crate produce these from raw elevation input.
    pub fn new(
        kaq: Vec<f64>,
        haq: Vec<f64>,
        c: Vec<f64>,
        saq: Vec<f64>,
        mut sll: Vec<f64>,
        topboundary: TopBoundary,
    ) -> Result<Self> {
        let naq = kaq.len();
        for (name, len) in [("Haq", haq.len()), ("c", c.len()), ("Saq", saq.len()), ("Sll", sll.len())] {
            if len != naq {
                return Err(Error::LengthMismatch {
                    name,
                    expected: naq,
                    actual: len,
                });
            }
        }
        for s in sll.iter_mut() {
            if *s < SLL_FLOOR {
                *s = SLL_FLOOR;
            }
        }
        let t: Vec<f64> = kaq.iter().zip(&haq).map(|(k, h)| k * h).collect();
        let d: Vec<f64> = t.iter().zip(&saq).map(|(t, s)| t / s).collect();
        Ok(Self {
            kaq,
            haq,
            t,
            c,
            saq,
            sll,
            d,
            topboundary,
        })
    }

    /// Number of aquifer layers.
    pub fn naq(&self) -> usize {
        self.kaq.len()
    }

    /// Convert a head in `layer` to a discharge potential.
    pub fn head_to_potential(&self, h: f64, layer: usize) -> f64 {
        h * self.t[layer]
    }

    /// Convert a discharge potential in `layer` to a head.
    pub fn potential_to_head(&self, pot: f64, layer: usize) -> f64 {
        pot / self.t[layer]
    }
}

/// An aquifer system together with its modal basis on a Laplace grid.
#[derive(Debug, Clone)]
pub struct Aquifer {
    /// Layer properties.
    pub data: AquiferData,
    /// Eigendecomposition of the vertical-flow operator per Laplace parameter.
    pub basis: ModalBasis,
}

impl Aquifer {
    /// Decompose the vertical-flow operator at every parameter of `grid`.
    pub fn new(data: AquiferData, grid: &LaplaceGrid) -> Result<Self> {
        let basis = ModalBasis::compute(&data, &grid.p)?;
        Ok(Self { data, basis })
    }

    /// Number of aquifer layers.
    pub fn naq(&self) -> usize {
        self.data.naq()
    }

    /// Decay length of mode `i` at flat parameter index `k`.
    pub fn lab(&self, i: usize, k: usize) -> Complex64 {
        self.basis.lab[(i, k)]
    }
}
