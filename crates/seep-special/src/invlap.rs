//! Numerical inverse Laplace transform after de Hoog, Knight & Stokes.
//!
//! The damped Fourier series for one logarithmic time interval is accelerated
//! with the quotient-difference algorithm: the 2M+1 samples along the line
//! `gamma + i*pi*j/T` become continued-fraction coefficients, the fraction is
//! evaluated at `z = exp(i*pi*t/T)` with the usual remainder correction, and
//! the damping is undone by `exp(gamma*t)/T`.

use num_complex::Complex64;

/// Invert one sample block at the requested times.
///
/// * `t` — evaluation times, all within the interval the block was built for
/// * `t2` — upper bound of the interval; the series period is `2 * t2`
/// * `fp` — the `2m + 1` samples of the transform along the damped line
/// * `gamma` — damping factor of the interval
/// * `m` — Fourier-series half-length
pub fn dehoog(t: &[f64], t2: f64, fp: &[Complex64], gamma: f64, m: usize) -> Vec<f64> {
    let np = 2 * m + 1;
    assert_eq!(fp.len(), np, "sample block must hold 2M+1 values");
    let bigt = 2.0 * t2;
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);

    let mut a: Vec<Complex64> = fp.to_vec();
    a[0] *= 0.5;

    // quotient-difference table; e[r]/q[r] live on shrinking diagonals
    let mut d = vec![zero; np];
    let mut e = vec![vec![zero; np]; m + 1];
    let mut q = vec![vec![zero; np]; m + 1];
    for j in 0..np - 1 {
        q[1][j] = a[j + 1] / a[j];
    }
    d[0] = a[0];
    for r in 1..=m {
        for j in 0..(2 * (m - r) + 1) {
            e[r][j] = q[r][j + 1] - q[r][j] + e[r - 1][j + 1];
        }
        d[2 * r - 1] = -q[r][0];
        d[2 * r] = -e[r][0];
        if r < m {
            for j in 0..(2 * (m - r)) {
                q[r + 1][j] = q[r][j + 1] * e[r][j + 1] / e[r][j];
            }
        }
    }

    t.iter()
        .map(|&tt| {
            let z = Complex64::from_polar(1.0, std::f64::consts::PI * tt / bigt);
            // continued fraction by forward recurrence
            let mut a2 = zero; // A_{n-2}
            let mut b2 = one;
            let mut a1 = d[0]; // A_{n-1}
            let mut b1 = one;
            for dn in d.iter().skip(1) {
                let an = a1 + dn * z * a2;
                let bn = b1 + dn * z * b2;
                a2 = a1;
                b2 = b1;
                a1 = an;
                b1 = bn;
            }
            // remainder estimate for the truncated tail
            let brem = (one + (d[np - 2] - d[np - 1]) * z) * 0.5;
            let rem = -brem * (one - (one + d[np - 1] * z / (brem * brem)).sqrt());
            let afin = a1 + rem * a2;
            let bfin = b1 + rem * b2;
            (gamma * tt).exp() / bigt * (afin / bfin).re
        })
        .collect()
}
