//! Assembly of the global boundary-condition system.
//!
//! Every element with unknowns contributes a contiguous block of rows; the
//! columns span the unknowns of all elements in registration order. One dense
//! system is built per Laplace parameter and the batch is solved in one go,
//! after which the solutions are scattered into the element strengths.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use seep_core::{Aquifer, LaplaceGrid};
use seep_elements::{Element, EquationContext};

use crate::batch::solve_batch_complex;
use crate::error::{Error, Result};

/// Count unknowns, assemble, solve and scatter. Returns the number of
/// equations; zero means there was nothing to solve.
///
/// All elements must be initialized against `aq` and `grid` beforehand.
pub fn solve_system(
    elements: &mut [Box<dyn Element>],
    aq: &Aquifer,
    grid: &LaplaceGrid,
) -> Result<usize> {
    let neq: usize = elements.iter().map(|e| e.nunknowns()).sum();
    if neq == 0 {
        log::debug!("no unknowns; solution complete");
        return Ok(0);
    }
    let np = grid.np();
    log::debug!("assembling {} equations at {} Laplace parameters", neq, np);

    let mut mats = vec![DMatrix::<Complex64>::zeros(neq, neq); np];
    let mut rhs = vec![DVector::<Complex64>::zeros(neq); np];
    {
        let shared: &[Box<dyn Element>] = elements;
        let mut ieq = 0;
        for (i, e) in shared.iter().enumerate() {
            let nunk = e.nunknowns();
            if nunk == 0 {
                continue;
            }
            let ctx = EquationContext {
                elements: shared,
                self_index: i,
                neq,
                aq,
                grid,
            };
            let block = e
                .equation(&ctx)
                .ok_or_else(|| Error::MissingEquation(e.name().to_string()))?;
            for r in 0..nunk {
                for k in 0..np {
                    for c in 0..neq {
                        mats[k][(ieq + r, c)] = block.mat[r][(c, k)];
                    }
                    rhs[k][ieq + r] = block.rhs[(r, k)];
                }
            }
            ieq += nunk;
        }
    }

    let solutions = solve_batch_complex(&mats, &rhs)?;

    let mut ieq = 0;
    for e in elements.iter_mut() {
        let nunk = e.nunknowns();
        if nunk == 0 {
            continue;
        }
        let params = e.parameters_mut();
        for r in 0..nunk {
            for k in 0..np {
                params[(r, k)] = solutions[k][ieq + r];
            }
        }
        ieq += nunk;
    }
    log::debug!("solution complete");
    Ok(neq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seep_core::{AquiferData, TopBoundary};
    use seep_elements::Well;

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
        let grid = LaplaceGrid::new(1.0, 10.0, 8).unwrap();
        let aq = Aquifer::new(data, &grid).unwrap();
        (aq, grid)
    }

    #[test]
    fn test_no_unknowns_is_noop() {
        let (aq, grid) = fixture();
        let mut elements: Vec<Box<dyn Element>> = vec![Box::new(Well::new(
            0.0,
            0.0,
            0.1,
            &[100.0],
            &[0],
        ))];
        for e in elements.iter_mut() {
            e.initialize(&aq, &grid).unwrap();
        }
        let neq = solve_system(&mut elements, &aq, &grid).unwrap();
        assert_eq!(neq, 0);
    }

    #[test]
    fn test_head_well_meets_condition() {
        let (aq, grid) = fixture();
        let hc = 2.5;
        let mut elements: Vec<Box<dyn Element>> = vec![Box::new(Well::head_specified(
            0.0,
            0.0,
            0.1,
            &[hc],
            &[0],
        ))];
        for e in elements.iter_mut() {
            e.initialize(&aq, &grid).unwrap();
        }
        let neq = solve_system(&mut elements, &aq, &grid).unwrap();
        assert_eq!(neq, 1);

        // at the control point the Laplace-domain potential is h*T/p
        let (xc, yc) = elements[0].control_point().unwrap();
        let pot = elements[0].potentiallayer(xc, yc, &[0], &aq, &grid);
        let t0 = aq.data.t[0];
        for k in 0..grid.np() {
            let expected = hc * t0 / grid.p[k];
            assert!(
                (pot[(0, k)] - expected).norm() < 1e-8 * expected.norm(),
                "potential at parameter {}: {} vs {}",
                k,
                pot[(0, k)],
                expected
            );
        }
    }

    #[test]
    fn test_superposed_head_wells() {
        // two head wells hold their own conditions simultaneously
        let (aq, grid) = fixture();
        let mut elements: Vec<Box<dyn Element>> = vec![
            Box::new(Well::head_specified(0.0, 0.0, 0.1, &[1.0], &[0])),
            Box::new(Well::head_specified(25.0, 0.0, 0.1, &[-0.5], &[0])),
        ];
        for e in elements.iter_mut() {
            e.initialize(&aq, &grid).unwrap();
        }
        let neq = solve_system(&mut elements, &aq, &grid).unwrap();
        assert_eq!(neq, 2);

        let t0 = aq.data.t[0];
        for (idx, hc) in [(0usize, 1.0), (1usize, -0.5)] {
            let (xc, yc) = elements[idx].control_point().unwrap();
            let mut total = DMatrix::<Complex64>::zeros(1, grid.np());
            for e in &elements {
                total += e.potentiallayer(xc, yc, &[0], &aq, &grid);
            }
            for k in 0..grid.np() {
                let expected = hc * t0 / grid.p[k];
                assert!(
                    (total[(0, k)] - expected).norm() < 1e-8 * expected.norm().max(1e-12),
                    "well {} parameter {}: {} vs {}",
                    idx,
                    k,
                    total[(0, k)],
                    expected
                );
            }
        }
    }
}
