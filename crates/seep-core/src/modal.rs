//! Modal decomposition of the vertical-flow operator.
//!
//! At a Laplace parameter `p` the coupled multi-aquifer system reduces to the
//! tridiagonal operator `A(p)` acting on the vector of aquifer potentials.
//! Its eigenvalues define per-mode radial decay lengths `1/sqrt(lambda)`; the
//! eigenvector matrix `E` (columns are eigenvectors, ordered by descending
//! |lambda|) maps modal potentials to layer potentials, and `C = E^-1` maps a
//! unit source in a physical layer to its modal projection. `E * C = I` ties
//! the two together and is what makes element influences separable per mode.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::aquifer::{AquiferData, TopBoundary};
use crate::error::{Error, Result};

/// Above this magnitude of sqrt(p*Sll*c) the coth/csch pair is evaluated in
/// exponential form to avoid overflow in sinh.
const ASYMPTOTIC_SWITCH: f64 = 200.0;

/// The aquitard stretch pair `(s*coth(s), s*csch(s))`.
fn stretch_pair(s: Complex64) -> (Complex64, Complex64) {
    if s.norm() < ASYMPTOTIC_SWITCH {
        (s / s.tanh(), s / s.sinh())
    } else {
        let e1 = (-s).exp();
        let e2 = (-2.0 * s).exp();
        let a = s * (1.0 + e2) / (1.0 - e2);
        let b = s * 2.0 * e1 / (1.0 - e2);
        (a, b)
    }
}

/// Assemble the tridiagonal vertical-flow operator at parameter `p`.
pub fn system_matrix(aq: &AquiferData, p: Complex64) -> DMatrix<Complex64> {
    let naq = aq.naq();
    let mut s = vec![Complex64::new(f64::NAN, f64::NAN); naq];
    let mut a = s.clone();
    let mut b = s.clone();
    for i in 0..naq {
        // c[0] is NaN for an impermeable top; the entry is never read then.
        if aq.c[i].is_finite() {
            s[i] = (p * aq.sll[i] * aq.c[i]).sqrt();
            let (ai, bi) = stretch_pair(s[i]);
            a[i] = ai;
            b[i] = bi;
        }
    }

    let mut mat = DMatrix::<Complex64>::zeros(naq, naq);
    for i in 0..naq {
        let mut d0 = p / aq.d[i];
        if i < naq - 1 {
            d0 += a[i + 1] / (aq.c[i + 1] * aq.t[i]);
        }
        if i > 0 {
            d0 += a[i] / (aq.c[i] * aq.t[i]);
        }
        mat[(i, i)] = d0;
    }
    match aq.topboundary {
        TopBoundary::Impermeable => {}
        TopBoundary::Leaky => {
            mat[(0, 0)] += s[0] * s[0].tanh() / (aq.c[0] * aq.t[0]);
        }
        TopBoundary::SemiConfined => {
            mat[(0, 0)] += a[0] / (aq.c[0] * aq.t[0]);
        }
    }
    for i in 0..naq - 1 {
        mat[(i + 1, i)] = -b[i + 1] / (aq.c[i + 1] * aq.t[i]);
        mat[(i, i + 1)] = -b[i + 1] / (aq.c[i + 1] * aq.t[i + 1]);
    }
    mat
}

/// Eigenvalues off the complex Schur form.
///
/// nalgebra's `eigenvalues()` declines quasi-triangular forms that keep a
/// 2x2 block, so unresolved blocks are closed out with the quadratic formula.
fn schur_eigenvalues(mat: &DMatrix<Complex64>, p: Complex64) -> Result<Vec<Complex64>> {
    let schur = mat
        .clone()
        .try_schur(f64::EPSILON, 500)
        .ok_or(Error::Eigendecomposition { re: p.re, im: p.im })?;
    let (_, t) = schur.unpack();
    let n = t.nrows();
    let mut vals = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        let coupled = i + 1 < n && {
            let scale = t[(i, i)].norm() + t[(i + 1, i + 1)].norm();
            t[(i + 1, i)].norm() > f64::EPSILON * scale.max(1.0)
        };
        if coupled {
            let tr = t[(i, i)] + t[(i + 1, i + 1)];
            let det = t[(i, i)] * t[(i + 1, i + 1)] - t[(i, i + 1)] * t[(i + 1, i)];
            let disc = (tr * tr - 4.0 * det).sqrt();
            vals.push((tr + disc) * 0.5);
            vals.push((tr - disc) * 0.5);
            i += 2;
        } else {
            vals.push(t[(i, i)]);
            i += 1;
        }
    }
    Ok(vals)
}

/// One eigenvector as the null-space direction of `A - lambda I`, taken from
/// the right-singular vector of the smallest singular value.
fn eigenvector(
    mat: &DMatrix<Complex64>,
    lambda: Complex64,
    p: Complex64,
) -> Result<DVector<Complex64>> {
    let n = mat.nrows();
    let mut shifted = mat.clone();
    for i in 0..n {
        shifted[(i, i)] -= lambda;
    }
    let svd = shifted.svd(true, true);
    let v_t = svd.v_t.ok_or(Error::SingularModes { re: p.re, im: p.im })?;
    let row = v_t.nrows() - 1;
    Ok(DVector::from_fn(n, |i, _| v_t[(row, i)].conj()))
}

/// Eigendecomposition of the vertical-flow operator at one Laplace parameter.
#[derive(Debug, Clone)]
pub struct ModalDecomposition {
    /// Eigenvalues, sorted by descending modulus.
    pub eigval: DVector<Complex64>,
    /// Eigenvector matrix `E`; column `i` is the eigenvector of mode `i`.
    pub eigvec: DMatrix<Complex64>,
    /// `C = E^-1`; column `l` projects a unit source in layer `l` onto modes.
    pub coef: DMatrix<Complex64>,
    /// Decay length per mode, `1 / sqrt(eigval)`.
    pub lab: DVector<Complex64>,
}

impl ModalDecomposition {
    /// Decompose `A(p)`.
    pub fn compute(aq: &AquiferData, p: Complex64) -> Result<Self> {
        let naq = aq.naq();
        let mat = system_matrix(aq, p);

        let mut vals = if naq == 1 {
            vec![mat[(0, 0)]]
        } else {
            schur_eigenvalues(&mat, p)?
        };
        let mut idx: Vec<usize> = (0..naq).collect();
        idx.sort_by(|&ia, &ib| {
            vals[ib]
                .norm()
                .partial_cmp(&vals[ia].norm())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        vals = idx.iter().map(|&i| vals[i]).collect();

        let mut eigvec = DMatrix::<Complex64>::zeros(naq, naq);
        if naq == 1 {
            eigvec[(0, 0)] = Complex64::new(1.0, 0.0);
        } else {
            for (col, &lam) in vals.iter().enumerate() {
                let v = eigenvector(&mat, lam, p)?;
                eigvec.set_column(col, &v);
            }
        }

        let identity = DMatrix::<Complex64>::identity(naq, naq);
        let coef = eigvec
            .clone()
            .lu()
            .solve(&identity)
            .ok_or(Error::SingularModes { re: p.re, im: p.im })?;

        let eigval = DVector::from_vec(vals);
        let lab = eigval.map(|l| Complex64::new(1.0, 0.0) / l.sqrt());
        Ok(Self {
            eigval,
            eigvec,
            coef,
            lab,
        })
    }
}

/// Modal decompositions at every parameter of a Laplace grid.
#[derive(Debug, Clone)]
pub struct ModalBasis {
    /// One decomposition per flat parameter index.
    pub modes: Vec<ModalDecomposition>,
    /// Decay lengths, `naq x np`.
    pub lab: DMatrix<Complex64>,
}

impl ModalBasis {
    /// Decompose the operator at every parameter.
    pub fn compute(aq: &AquiferData, p: &[Complex64]) -> Result<Self> {
        let modes: Vec<ModalDecomposition> = p
            .iter()
            .map(|&pk| ModalDecomposition::compute(aq, pk))
            .collect::<Result<_>>()?;
        let naq = aq.naq();
        let lab = DMatrix::from_fn(naq, p.len(), |i, k| modes[k].lab[i]);
        log::debug!("modal basis ready: {} layers, {} parameters", naq, p.len());
        Ok(Self { modes, lab })
    }
}
