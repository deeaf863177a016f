//! Laplace-parameter grid over logarithmic time intervals.
//!
//! The time window [tmin, tmax] is split into decades [10^n, 10^(n+1)]. Each
//! decade gets its own damped Fourier series: a period equal to twice the
//! decade's upper bound, a damping factor chosen so the series tail is below
//! tolerance, and 2M+1 Laplace parameters along the vertical line
//! `gamma + i*pi*j/T`. All element influence functions are evaluated at every
//! parameter of the concatenated grid, which is fixed for the model lifetime.

use num_complex::Complex64;

use crate::error::{Error, Result};

/// Series truncation tolerance used to pick the damping factor.
const TOL: f64 = 1e-9;

/// The set of Laplace parameters at which a model is solved.
#[derive(Debug, Clone)]
pub struct LaplaceGrid {
    /// Start of the time window (strict lower bound for evaluation).
    pub tmin: f64,
    /// End of the time window.
    pub tmax: f64,
    /// Fourier-series half-length; each interval carries 2M+1 parameters.
    pub m: usize,
    /// Decade boundaries, `nin + 1` values `10^itmin ..= 10^itmax`.
    pub tintervals: Vec<f64>,
    /// Number of logarithmic intervals.
    pub nin: usize,
    /// Parameters per interval, `2 * m + 1`.
    pub npin: usize,
    /// Damping factor per interval.
    pub gamma: Vec<f64>,
    /// Flat parameter sequence, interval-major, length `nin * npin`.
    pub p: Vec<Complex64>,
}

impl LaplaceGrid {
    /// Build the grid for a time window and Fourier-series half-length.
    pub fn new(tmin: f64, tmax: f64, m: usize) -> Result<Self> {
        if !(tmin > 0.0) || !(tmax > tmin) {
            return Err(Error::TimeWindow { tmin, tmax });
        }
        if m < 4 {
            return Err(Error::FourierLength(m));
        }

        let itmin = tmin.log10().floor() as i32;
        let itmax = tmax.log10().ceil() as i32;
        let nin = (itmax - itmin) as usize;
        let npin = 2 * m + 1;

        let tintervals: Vec<f64> = (itmin..=itmax).map(|e| 10f64.powi(e)).collect();

        let mut gamma = Vec::with_capacity(nin);
        let mut p = Vec::with_capacity(nin * npin);
        for n in 0..nin {
            let period = 2.0 * tintervals[n + 1];
            let g = -TOL.ln() / (period / 2.0);
            gamma.push(g);
            for j in 0..npin {
                p.push(Complex64::new(g, std::f64::consts::PI * j as f64 / period));
            }
        }

        Ok(Self {
            tmin,
            tmax,
            m,
            tintervals,
            nin,
            npin,
            gamma,
            p,
        })
    }

    /// Total number of Laplace parameters.
    pub fn np(&self) -> usize {
        self.nin * self.npin
    }

    /// The parameter block of interval `n`.
    pub fn p_block(&self, n: usize) -> &[Complex64] {
        &self.p[n * self.npin..(n + 1) * self.npin]
    }

    /// The interval containing time `t`, if any.
    ///
    /// Intervals are half-open on the right except the last, which is closed.
    pub fn interval_of(&self, t: f64) -> Option<usize> {
        for n in 0..self.nin {
            let closed = n == self.nin - 1;
            if t >= self.tintervals[n]
                && (t < self.tintervals[n + 1] || (closed && t <= self.tintervals[n + 1]))
            {
                return Some(n);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_decades() {
        let grid = LaplaceGrid::new(1.0, 1e3, 20).unwrap();
        assert_eq!(grid.nin, 3);
        assert_eq!(grid.npin, 41);
        assert_eq!(grid.np(), 123);
        assert_eq!(grid.tintervals, vec![1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn test_grid_partial_decade() {
        // [3, 5] still spans the full decade [1, 10]
        let grid = LaplaceGrid::new(3.0, 5.0, 20).unwrap();
        assert_eq!(grid.nin, 1);
        assert_eq!(grid.tintervals, vec![1.0, 10.0]);
    }

    #[test]
    fn test_grid_parameters() {
        let grid = LaplaceGrid::new(1.0, 10.0, 4).unwrap();
        let period = 20.0;
        let g = -(1e-9f64).ln() / 10.0;
        assert!((grid.gamma[0] - g).abs() < 1e-14);
        // j = 0 parameter is purely real and equal to gamma
        assert!((grid.p[0] - Complex64::new(g, 0.0)).norm() < 1e-14);
        // spacing along the imaginary axis is pi / period
        let dp = grid.p[1] - grid.p[0];
        assert!((dp.im - std::f64::consts::PI / period).abs() < 1e-14);
        assert!(dp.re.abs() < 1e-14);
    }

    #[test]
    fn test_interval_lookup() {
        let grid = LaplaceGrid::new(1.0, 1e3, 20).unwrap();
        assert_eq!(grid.interval_of(1.0), Some(0));
        assert_eq!(grid.interval_of(10.0), Some(1));
        assert_eq!(grid.interval_of(999.0), Some(2));
        // last interval is closed on the right
        assert_eq!(grid.interval_of(1000.0), Some(2));
        assert_eq!(grid.interval_of(1000.1), None);
        assert_eq!(grid.interval_of(0.5), None);
    }

    #[test]
    fn test_grid_rejects_bad_window() {
        assert!(matches!(
            LaplaceGrid::new(0.0, 10.0, 20),
            Err(Error::TimeWindow { .. })
        ));
        assert!(matches!(
            LaplaceGrid::new(10.0, 10.0, 20),
            Err(Error::TimeWindow { .. })
        ));
        assert!(matches!(
            LaplaceGrid::new(1.0, 10.0, 3),
            Err(Error::FourierLength(3))
        ));
    }
}
