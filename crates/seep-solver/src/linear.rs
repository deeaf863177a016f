//! Dense complex linear solve, nalgebra reference path.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

use crate::error::{Error, Result};

/// Solve a complex linear system Ax = b using LU decomposition.
pub fn solve_complex(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Result<DVector<Complex<f64>>> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    a.clone().lu().solve(b).ok_or(Error::SingularMatrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn test_solve_complex_simple() {
        // (2+i)x + y = 5+i
        // x + (3-i)y = 6
        let a = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex::new(2.0, 1.0),
                Complex::new(1.0, 0.0),
                Complex::new(1.0, 0.0),
                Complex::new(3.0, -1.0),
            ],
        );
        let b = dvector![Complex::new(5.0, 1.0), Complex::new(6.0, 0.0)];

        let x = solve_complex(&a, &b).unwrap();

        // Verify by computing Ax and comparing to b
        let ax = &a * &x;
        assert!((ax[0] - b[0]).norm() < 1e-10, "Ax[0] mismatch");
        assert!((ax[1] - b[1]).norm() < 1e-10, "Ax[1] mismatch");
    }

    #[test]
    fn test_singular_matrix() {
        let a = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex::new(1.0, 0.0),
                Complex::new(2.0, 0.0),
                Complex::new(2.0, 0.0),
                Complex::new(4.0, 0.0),
            ],
        );
        let b = dvector![Complex::new(1.0, 0.0), Complex::new(2.0, 0.0)];

        let result = solve_complex(&a, &b);
        assert!(matches!(result, Err(Error::SingularMatrix)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DMatrix::from_element(2, 2, Complex::new(1.0, 0.0));
        let b = DVector::from_element(3, Complex::new(1.0, 0.0));

        let result = solve_complex(&a, &b);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
