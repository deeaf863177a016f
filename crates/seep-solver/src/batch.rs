//! Batched dense complex LU over the Laplace-parameter systems.
//!
//! The per-parameter systems are independent, so they are factored in
//! parallel with faer's partial-pivot LU. A singular factorization shows up
//! as non-finite entries in the solution; the offending parameter indices
//! are collected and surfaced as one error.

use faer::prelude::*;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Solve one complex system with faer's partial-pivot LU.
///
/// Returns `None` when the factorization produced non-finite entries.
fn solve_one(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Option<DVector<Complex<f64>>> {
    let n = a.nrows();
    let matrix = Mat::<c64>::from_fn(n, n, |row, col| {
        let v = a[(row, col)];
        c64::new(v.re, v.im)
    });
    let rhs = Col::<c64>::from_fn(n, |row| c64::new(b[row].re, b[row].im));

    let plu = matrix.partial_piv_lu();
    let x = plu.solve(&rhs);

    for j in 0..n {
        if !x[j].re.is_finite() || !x[j].im.is_finite() {
            return None;
        }
    }
    Some(DVector::from_fn(n, |j, _| Complex::new(x[j].re, x[j].im)))
}

/// Solve every system of the batch; all must share the same dimension.
pub fn solve_batch_complex(
    mats: &[DMatrix<Complex<f64>>],
    rhs: &[DVector<Complex<f64>>],
) -> Result<Vec<DVector<Complex<f64>>>> {
    if mats.len() != rhs.len() {
        return Err(Error::DimensionMismatch {
            expected: mats.len(),
            actual: rhs.len(),
        });
    }
    let total = mats.len();
    for (a, b) in mats.iter().zip(rhs) {
        if a.nrows() != a.ncols() || a.nrows() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.nrows(),
                actual: b.len(),
            });
        }
    }

    let solutions: Vec<Option<DVector<Complex<f64>>>> = mats
        .par_iter()
        .zip(rhs.par_iter())
        .map(|(a, b)| solve_one(a, b))
        .collect();

    let singular: Vec<usize> = solutions
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.is_none().then_some(i))
        .collect();
    if !singular.is_empty() {
        return Err(Error::SingularBatch {
            indices: singular,
            total,
        });
    }

    Ok(solutions.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::solve_complex;

    fn test_system(k: usize, n: usize) -> (DMatrix<Complex<f64>>, DVector<Complex<f64>>) {
        // diagonally dominant, parameter-dependent
        let a = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                Complex::new(n as f64 + 1.0, 0.5 * k as f64 + 0.1)
            } else {
                Complex::new(1.0 / ((i as f64 - j as f64).abs() + 1.0), 0.2)
            }
        });
        let b = DVector::from_fn(n, |i, _| Complex::new((i + 1) as f64, k as f64));
        (a, b)
    }

    #[test]
    fn test_batch_matches_reference_solver() {
        let n = 8;
        let (mats, rhs): (Vec<_>, Vec<_>) = (0..12).map(|k| test_system(k, n)).unzip();

        let batch = solve_batch_complex(&mats, &rhs).unwrap();
        for k in 0..mats.len() {
            let reference = solve_complex(&mats[k], &rhs[k]).unwrap();
            for i in 0..n {
                assert!(
                    (batch[k][i] - reference[i]).norm() < 1e-10,
                    "mismatch in system {} at [{}]: {} vs {}",
                    k,
                    i,
                    batch[k][i],
                    reference[i]
                );
            }
        }
    }

    #[test]
    fn test_batch_reports_singular_indices() {
        let n = 3;
        let (good, b) = test_system(0, n);
        let singular = DMatrix::from_element(n, n, Complex::new(1.0, 0.0));

        let mats = vec![good.clone(), singular, good];
        let rhs = vec![b.clone(), b.clone(), b];
        match solve_batch_complex(&mats, &rhs) {
            Err(Error::SingularBatch { indices, total }) => {
                assert_eq!(indices, vec![1]);
                assert_eq!(total, 3);
            }
            other => panic!("expected SingularBatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_batch_dimension_check() {
        let (a, b) = test_system(0, 4);
        let result = solve_batch_complex(&[a], &[b.clone(), b]);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
