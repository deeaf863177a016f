//! Modified Bessel functions of complex argument and segment kernels.
//!
//! The radial decay of every aquifer mode is governed by K0 and K1 at the
//! complex argument `r / lab`, where `lab` is the mode's decay length. The
//! arguments of interest lie in the right half-plane (the Laplace parameters
//! have positive real part), so two classical evaluations cover the range:
//! the ascending series near the origin and the Lentz-evaluated continued
//! fraction elsewhere. Both deliver K0 and K1 together.

use num_complex::Complex64;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Crossover between the ascending series and the continued fraction.
const SERIES_RADIUS: f64 = 2.0;

/// Iteration cap for the continued fraction.
const MAX_ITER: usize = 10_000;

/// K0 of a complex argument with positive real part.
pub fn besselk0(z: Complex64) -> Complex64 {
    besselk01(z).0
}

/// K1 of a complex argument with positive real part.
pub fn besselk1(z: Complex64) -> Complex64 {
    besselk01(z).1
}

/// K0 and K1 of a complex argument with positive real part.
pub fn besselk01(z: Complex64) -> (Complex64, Complex64) {
    if z.norm() <= SERIES_RADIUS {
        series_k01(z)
    } else {
        fraction_k01(z)
    }
}

/// Ascending series for K0 and K1 (A&S 9.6.11 with the I0/I1 series).
fn series_k01(z: Complex64) -> (Complex64, Complex64) {
    let one = Complex64::new(1.0, 0.0);
    let q = z * z * 0.25;

    let mut term0 = one; // q^k / (k!)^2
    let mut i0 = one;
    let mut sum0 = Complex64::new(0.0, 0.0); // sum H_k q^k / (k!)^2
    let mut term1 = one; // q^k / (k! (k+1)!)
    let mut i1sum = one;
    let mut sum1 = one; // sum (H_k + H_{k+1}) q^k / (k! (k+1)!), k = 0 term is 1
    let mut h = 0.0; // harmonic number H_k

    for k in 1..64usize {
        let kf = k as f64;
        term0 = term0 * q / (kf * kf);
        term1 = term1 * q / (kf * (kf + 1.0));
        h += 1.0 / kf;
        i0 += term0;
        sum0 += term0 * h;
        i1sum += term1;
        sum1 += term1 * (2.0 * h + 1.0 / (kf + 1.0));
        if term0.norm() < f64::EPSILON * i0.norm() && term1.norm() < f64::EPSILON * i1sum.norm() {
            break;
        }
    }

    let lg = (z * 0.5).ln() + EULER_GAMMA;
    let i1 = z * 0.5 * i1sum;
    let k0 = -lg * i0 + sum0;
    let k1 = one / z + lg * i1 - z * 0.25 * sum1;
    (k0, k1)
}

/// Continued-fraction evaluation of K0 and K1 (Lentz-style recurrences),
/// valid away from the origin for Re z > 0.
fn fraction_k01(z: Complex64) -> (Complex64, Complex64) {
    let one = Complex64::new(1.0, 0.0);
    let mut b = (z + 1.0) * 2.0;
    let mut d = one / b;
    let mut h = d;
    let mut delh = d;
    let mut q1 = Complex64::new(0.0, 0.0);
    let mut q2 = one;
    let a1 = 0.25;
    let mut q = Complex64::new(a1, 0.0);
    let mut c = a1;
    let mut a = -a1;
    let mut s = one + q * delh;

    for i in 2..MAX_ITER {
        a -= 2.0 * (i - 1) as f64;
        c = -a * c / i as f64;
        let qnew = (q1 - b * q2) / a;
        q1 = q2;
        q2 = qnew;
        q += c * qnew;
        b += 2.0;
        d = one / (b + a * d);
        delh = (b * d - one) * delh;
        h += delh;
        let dels = q * delh;
        s += dels;
        if dels.norm() <= f64::EPSILON * s.norm() {
            break;
        }
    }

    h = a1 * h;
    let pref = (std::f64::consts::PI / (2.0 * z)).sqrt() * (-z).exp();
    let k0 = pref / s;
    let k1 = k0 * (z + 0.5 - h) / z;
    (k0, k1)
}

// ────────────────────── segment kernels ──────────────────────

/// 10-point Gauss–Legendre nodes and weights on [-1, 1].
const GL_X: [f64; 10] = [
    -0.973_906_528_517_171_7,
    -0.865_063_366_688_984_5,
    -0.679_409_568_299_024_4,
    -0.433_395_394_129_247_2,
    -0.148_874_338_981_631_2,
    0.148_874_338_981_631_2,
    0.433_395_394_129_247_2,
    0.679_409_568_299_024_4,
    0.865_063_366_688_984_5,
    0.973_906_528_517_171_7,
];
const GL_W: [f64; 10] = [
    0.066_671_344_308_688_14,
    0.149_451_349_150_580_6,
    0.219_086_362_515_982_04,
    0.269_266_719_309_996_36,
    0.295_524_224_714_752_87,
    0.295_524_224_714_752_87,
    0.269_266_719_309_996_36,
    0.219_086_362_515_982_04,
    0.149_451_349_150_580_6,
    0.066_671_344_308_688_14,
];

/// Geometric panel levels toward the singular point.
const GRADE_LEVELS: usize = 30;

/// Line integral of K0 along a segment, one value per decay length:
///
/// `out[m] = ∫ K0(|zeta - (x+iy)| / lab[m]) |dzeta|` over `[za, zb]`.
///
/// The integrand has an integrable log singularity where the query point
/// projects onto the segment; panels are graded geometrically toward that
/// point so plain Gauss–Legendre handles the remainder.
pub fn besselk0_line(
    x: f64,
    y: f64,
    za: Complex64,
    zb: Complex64,
    lab: &[Complex64],
    out: &mut [Complex64],
) {
    assert_eq!(lab.len(), out.len(), "one output slot per decay length");
    for v in out.iter_mut() {
        *v = Complex64::new(0.0, 0.0);
    }
    let z0 = Complex64::new(x, y);
    let dz = zb - za;
    let len = dz.norm();
    if len == 0.0 {
        return;
    }

    // parameter of the orthogonal projection of z0, clamped into the segment
    let sc = (((z0 - za) * dz.conj()).re / (len * len)).clamp(0.0, 1.0);

    let mut integrate_side = |s_from: f64, s_to: f64, singular_at_left: bool| {
        let side = s_to - s_from;
        if side <= 0.0 {
            return;
        }
        // panel boundaries as distances from the singular end
        let mut edges = Vec::with_capacity(GRADE_LEVELS + 2);
        edges.push(0.0);
        for j in (0..=GRADE_LEVELS).rev() {
            edges.push(side * 0.5f64.powi(j as i32));
        }
        for w in edges.windows(2) {
            let (lo, hi) = (w[0], w[1]);
            let half = 0.5 * (hi - lo);
            let mid = 0.5 * (hi + lo);
            for (xi, wi) in GL_X.iter().zip(GL_W.iter()) {
                let dist = mid + half * xi;
                let s = if singular_at_left {
                    s_from + dist
                } else {
                    s_to - dist
                };
                let r = (za + s * dz - z0).norm();
                let darc = wi * half * len;
                for (m, &l) in lab.iter().enumerate() {
                    out[m] += darc * besselk0(r / l);
                }
            }
        }
    };

    integrate_side(0.0, sc, false);
    integrate_side(sc, 1.0, true);
}

/// The part of segment [z1, z2] inside the disc of radius `r` around `zc`.
///
/// Returns the clipped endpoints, or `None` when the disc misses the segment.
pub fn circle_line_intersection(
    z1: Complex64,
    z2: Complex64,
    zc: Complex64,
    r: f64,
) -> Option<(Complex64, Complex64)> {
    let dz = z2 - z1;
    let l2 = dz.norm_sqr();
    if l2 == 0.0 {
        return None;
    }
    // |z1 + t dz - zc|^2 = r^2 as a quadratic in t
    let w = z1 - zc;
    let b = 2.0 * (dz.conj() * w).re;
    let c = w.norm_sqr() - r * r;
    let disc = b * b - 4.0 * l2 * c;
    if disc <= 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let ta = ((-b - sq) / (2.0 * l2)).max(0.0);
    let tb = ((-b + sq) / (2.0 * l2)).min(1.0);
    if ta >= tb {
        return None;
    }
    Some((z1 + ta * dz, z1 + tb * dz))
}
