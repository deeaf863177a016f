//! Boundary-condition row emitters.
//!
//! Each emitter builds the rows one element contributes to the global
//! system: columns for every element with unknowns, right-hand-side
//! corrections for every element with prescribed strengths. The emitting
//! element is identified by index so its own columns can carry the
//! diagonal strength corrections (entry resistance, casing storage).

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::element::{EquationBlock, EquationContext};

/// Head-specified rows, optionally with an entry-resistance correction on
/// the element's own diagonal: potential at the control point equals
/// `pc / p` (minus resistance times the element's own strength influence).
pub fn head_rows(
    ctx: &EquationContext<'_>,
    xc: f64,
    yc: f64,
    layers: &[usize],
    pc: &[f64],
    resfac: Option<&[f64]>,
) -> EquationBlock {
    let me = &ctx.elements[ctx.self_index];
    let nunk = me.nunknowns();
    let np = ctx.grid.np();
    let mut mat = vec![DMatrix::zeros(ctx.neq, np); nunk];
    let mut rhs = DMatrix::zeros(nunk, np);
    for i in 0..nunk {
        for k in 0..np {
            rhs[(i, k)] = pc[i] / ctx.grid.p[k];
        }
    }

    let mut ieq = 0;
    for (j, e) in ctx.elements.iter().enumerate() {
        let enunk = e.nunknowns();
        if enunk > 0 {
            let pil = e.potinflayer(xc, yc, layers, ctx.aq, ctx.grid);
            for (r, row) in mat.iter_mut().enumerate() {
                for jj in 0..enunk {
                    for k in 0..np {
                        row[(ieq + jj, k)] = pil[r][(jj, k)];
                    }
                }
            }
            if j == ctx.self_index {
                if let Some(rf) = resfac {
                    let dis = me.strengthinflayer(ctx.aq, ctx.grid);
                    for (r, row) in mat.iter_mut().enumerate() {
                        for k in 0..np {
                            row[(ieq + r, k)] -= rf[r] * dis[(r, k)];
                        }
                    }
                }
            }
            ieq += enunk;
        } else {
            let pl = e.potentiallayer(xc, yc, layers, ctx.aq, ctx.grid);
            for r in 0..nunk {
                for k in 0..np {
                    rhs[(r, k)] -= pl[(r, k)];
                }
            }
        }
    }
    EquationBlock { mat, rhs }
}

/// Multi-screen rows: equal heads across the screened layers plus one row
/// fixing the total discharge. With `resfac`, the head-difference rows are
/// corrected by the per-layer entry-resistance head losses.
pub fn mscreen_rows(
    ctx: &EquationContext<'_>,
    xc: f64,
    yc: f64,
    layers: &[usize],
    qtot: f64,
    resfac: Option<&[f64]>,
) -> EquationBlock {
    let me = &ctx.elements[ctx.self_index];
    let nunk = me.nunknowns();
    let np = ctx.grid.np();
    let t = &ctx.aq.data.t;
    let mut mat = vec![DMatrix::zeros(ctx.neq, np); nunk];
    let mut rhs = DMatrix::zeros(nunk, np);
    for k in 0..np {
        // sum-of-strengths row; unit entries make this Qtot (i.e. the
        // Laplace-domain layer discharges sum to Qtot / p)
        rhs[(nunk - 1, k)] = Complex64::new(qtot, 0.0);
    }

    let mut ieq = 0;
    for (j, e) in ctx.elements.iter().enumerate() {
        let enunk = e.nunknowns();
        if enunk > 0 {
            let pil = e.potinflayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for jj in 0..enunk {
                    for k in 0..np {
                        let hi = pil[i][(jj, k)] / t[layers[i]];
                        let lo = pil[i + 1][(jj, k)] / t[layers[i + 1]];
                        mat[i][(ieq + jj, k)] = hi - lo;
                    }
                }
            }
            if j == ctx.self_index {
                if let Some(rf) = resfac {
                    let dis = me.strengthinflayer(ctx.aq, ctx.grid);
                    for i in 0..nunk - 1 {
                        for k in 0..np {
                            mat[i][(ieq + i, k)] -= rf[i] / t[layers[i]] * dis[(i, k)];
                            mat[i][(ieq + i + 1, k)] += rf[i + 1] / t[layers[i + 1]] * dis[(i + 1, k)];
                        }
                    }
                }
                for jj in 0..enunk {
                    for k in 0..np {
                        mat[nunk - 1][(ieq + jj, k)] = Complex64::new(1.0, 0.0);
                    }
                }
            }
            ieq += enunk;
        } else {
            let pl = e.potentiallayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for k in 0..np {
                    let hi = pl[(i, k)] / t[layers[i]];
                    let lo = pl[(i + 1, k)] / t[layers[i + 1]];
                    rhs[(i, k)] -= hi - lo;
                }
            }
        }
    }
    EquationBlock { mat, rhs }
}

/// Multi-screen rows with wellbore storage: the last row balances the sum
/// of layer inflows against the casing storage `pi rc^2 p h_top` and the
/// prescribed total discharge, `Qtot / p` for a step or `Qtot` for a slug.
#[allow(clippy::too_many_arguments)]
pub fn storage_rows(
    ctx: &EquationContext<'_>,
    xc: f64,
    yc: f64,
    layers: &[usize],
    qtot: f64,
    rc: f64,
    rw: f64,
    res: f64,
    slug: bool,
) -> EquationBlock {
    let me = &ctx.elements[ctx.self_index];
    let nunk = me.nunknowns();
    let np = ctx.grid.np();
    let t = &ctx.aq.data.t;
    let haq = &ctx.aq.data.haq;
    let p = &ctx.grid.p;
    let area = std::f64::consts::PI * rc * rc;
    let mut mat = vec![DMatrix::zeros(ctx.neq, np); nunk];
    let mut rhs = DMatrix::zeros(nunk, np);
    for k in 0..np {
        rhs[(nunk - 1, k)] = if slug {
            Complex64::new(qtot, 0.0)
        } else {
            qtot / p[k]
        };
    }

    let mut ieq = 0;
    for (j, e) in ctx.elements.iter().enumerate() {
        let enunk = e.nunknowns();
        if enunk > 0 {
            let pil = e.potinflayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for jj in 0..enunk {
                    for k in 0..np {
                        let hi = pil[i][(jj, k)] / t[layers[i]];
                        let lo = pil[i + 1][(jj, k)] / t[layers[i + 1]];
                        mat[i][(ieq + jj, k)] = hi - lo;
                    }
                }
            }
            for jj in 0..enunk {
                for k in 0..np {
                    let htop = pil[0][(jj, k)] / t[layers[0]];
                    mat[nunk - 1][(ieq + jj, k)] -= area * p[k] * htop;
                }
            }
            if j == ctx.self_index {
                let dis = me.strengthinflayer(ctx.aq, ctx.grid);
                let disterm = |i: usize, k: usize| {
                    dis[(i, k)] * res / (2.0 * std::f64::consts::PI * rw * haq[layers[i]])
                };
                if nunk > 1 {
                    for i in 0..nunk - 1 {
                        for k in 0..np {
                            mat[i][(ieq + i, k)] -= disterm(i, k);
                            mat[i][(ieq + i + 1, k)] += disterm(i + 1, k);
                        }
                    }
                }
                for jj in 0..enunk {
                    for k in 0..np {
                        mat[nunk - 1][(ieq + jj, k)] += Complex64::new(1.0, 0.0);
                    }
                }
                for k in 0..np {
                    mat[nunk - 1][(ieq, k)] += area * p[k] * disterm(0, k);
                }
            }
            ieq += enunk;
        } else {
            let pl = e.potentiallayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for k in 0..np {
                    let hi = pl[(i, k)] / t[layers[i]];
                    let lo = pl[(i + 1, k)] / t[layers[i + 1]];
                    rhs[(i, k)] -= hi - lo;
                }
            }
            for k in 0..np {
                let htop = pl[(0, k)] / t[layers[0]];
                rhs[(nunk - 1, k)] += area * p[k] * htop;
            }
        }
    }
    EquationBlock { mat, rhs }
}

/// Layer-connector rows: head drops between adjacent screens proportional
/// to the connector resistance times the cumulative discharge, and zero net
/// discharge overall.
pub fn hconn_rows(
    ctx: &EquationContext<'_>,
    xc: f64,
    yc: f64,
    layers: &[usize],
    res: &[f64],
) -> EquationBlock {
    let me = &ctx.elements[ctx.self_index];
    let nunk = me.nunknowns();
    let np = ctx.grid.np();
    let t = &ctx.aq.data.t;
    let mut mat = vec![DMatrix::zeros(ctx.neq, np); nunk];
    let mut rhs = DMatrix::zeros(nunk, np);
    let dis = me.strengthinflayer(ctx.aq, ctx.grid);

    let mut ieq = 0;
    for (j, e) in ctx.elements.iter().enumerate() {
        let enunk = e.nunknowns();
        if enunk > 0 {
            let pil = e.potinflayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for jj in 0..enunk {
                    for k in 0..np {
                        let hi = pil[i][(jj, k)] / t[layers[i]];
                        let lo = pil[i + 1][(jj, k)] / t[layers[i + 1]];
                        mat[i][(ieq + jj, k)] = hi - lo;
                    }
                }
            }
            if j == ctx.self_index {
                // TODO: the cumulative-discharge correction applies
                // dis[(i, k)] to every column 0..=i; verify against the
                // physical derivation whether column jj should carry
                // dis[(jj, k)] instead.
                for i in 0..nunk - 1 {
                    for col in 0..=i {
                        for k in 0..np {
                            mat[i][(ieq + col, k)] -= res[i] * dis[(i, k)];
                        }
                    }
                }
                for jj in 0..enunk {
                    for k in 0..np {
                        mat[nunk - 1][(ieq + jj, k)] = Complex64::new(1.0, 0.0);
                    }
                }
            }
            ieq += enunk;
        } else {
            let pl = e.potentiallayer(xc, yc, layers, ctx.aq, ctx.grid);
            for i in 0..nunk - 1 {
                for k in 0..np {
                    let hi = pl[(i, k)] / t[layers[i]];
                    let lo = pl[(i + 1, k)] / t[layers[i + 1]];
                    rhs[(i, k)] -= hi - lo;
                }
            }
        }
    }
    EquationBlock { mat, rhs }
}
