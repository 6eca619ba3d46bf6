// crates/turbdiag-core/src/engine/stencil.rs
//
// Periodic finite-difference operators. All arrays are indexed (i1, i2, i3).
// The Laplacian is the composition of the central-difference divergence and
// gradient, so grad(phi) is curl-free to round-off and v - grad(phi) is
// divergence-free up to the solver residual.

use ndarray::{Array3, Zip};
use serde::Deserialize;

#[inline]
fn wrap(i: usize, off: isize, n: usize) -> usize {
    ((i as isize + off).rem_euclid(n as isize)) as usize
}

/// Central difference along `axis` (0-based) with spacing `h`.
pub fn central_diff(a: &Array3<f64>, axis: usize, h: f64) -> Array3<f64> {
    let (n1, n2, n3) = a.dim();
    let n = [n1, n2, n3][axis];
    let inv = 1.0 / (2.0 * h);
    Array3::from_shape_fn(a.raw_dim(), |(i, j, k)| {
        let mut p = [i, j, k];
        let mut m = [i, j, k];
        p[axis] = wrap(p[axis], 1, n);
        m[axis] = wrap(m[axis], -1, n);
        (a[p] - a[m]) * inv
    })
}

pub fn divergence(v: [&Array3<f64>; 3], h: [f64; 3]) -> Array3<f64> {
    let mut out = central_diff(v[0], 0, h[0]);
    out += &central_diff(v[1], 1, h[1]);
    out += &central_diff(v[2], 2, h[2]);
    out
}

/// Wide-stencil Laplacian: sum over axes of (a[+2] - 2a + a[-2]) / (2h)^2.
pub fn laplacian(a: &Array3<f64>, h: [f64; 3]) -> Array3<f64> {
    let (n1, n2, n3) = a.dim();
    let n = [n1, n2, n3];
    let c = h.map(|d| 1.0 / (4.0 * d * d));
    Array3::from_shape_fn(a.raw_dim(), |(i, j, k)| {
        let idx = [i, j, k];
        let centre = a[idx];
        let mut acc = 0.0;
        for axis in 0..3 {
            let mut p = idx;
            let mut m = idx;
            p[axis] = wrap(p[axis], 2, n[axis]);
            m[axis] = wrap(m[axis], -2, n[axis]);
            acc += c[axis] * (a[p] + a[m] - 2.0 * centre);
        }
        acc
    })
}

/// Iterative scheme used by [`solve_poisson`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoissonMethod {
    /// Conjugate gradient on `-L`; iterations grow linearly with the edge.
    #[default]
    ConjugateGradient,
    /// Damped Jacobi; iterations grow with the square of the edge.
    Jacobi,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonParams {
    pub method: PoissonMethod,
    pub max_iterations: u32,
    /// Target relative residual ||f - L phi|| / ||f||.
    pub tolerance: f64,
    /// Damping factor of the Jacobi update, in (0, 1]. Unused by CG.
    pub relaxation: f64,
    /// True residual is evaluated every `check_every` iterations.
    pub check_every: u32,
}
#[derive(Clone, Debug)]
pub struct PoissonOutcome {
    pub phi: Array3<f64>,
    pub iterations: u32,
    pub residual: f64,
}

fn l2(a: &Array3<f64>) -> f64 {
    a.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn relative_residual(phi: &Array3<f64>, rhs: &Array3<f64>, h: [f64; 3], norm_rhs: f64) -> f64 {
    let mut r = laplacian(phi, h);
    Zip::from(&mut r).and(rhs).for_each(|r, &f| *r = f - *r);
    l2(&r) / norm_rhs
}

/// Solve `L phi = rhs` on a periodic grid. The mean of `phi` is removed.
///
/// Never fails: a non-finite residual stops the iteration and is returned
/// as-is for the caller to judge.
pub fn solve_poisson(rhs: &Array3<f64>, h: [f64; 3], p: &PoissonParams) -> PoissonOutcome {
    let norm_rhs = l2(rhs);
    if norm_rhs == 0.0 {
        return PoissonOutcome {
            phi: Array3::zeros(rhs.raw_dim()),
            iterations: 0,
            residual: 0.0,
        };
    }
    if !norm_rhs.is_finite() {
        return PoissonOutcome {
            phi: Array3::zeros(rhs.raw_dim()),
            iterations: 0,
            residual: f64::NAN,
        };
    }

    let (mut phi, iterations, residual) = match p.method {
        PoissonMethod::ConjugateGradient => conjugate_gradient(rhs, h, p, norm_rhs),
        PoissonMethod::Jacobi => jacobi(rhs, h, p, norm_rhs),
    };

    // gauge: phi is defined up to a constant
    if let Some(mean) = phi.mean() {
        if mean.is_finite() {
            phi.mapv_inplace(|v| v - mean);
        }
    }

    PoissonOutcome {
        phi,
        iterations,
        residual,
    }
}

fn dot(a: &Array3<f64>, b: &Array3<f64>) -> f64 {
    Zip::from(a).and(b).fold(0.0, |acc, &x, &y| acc + x * y)
}

/// CG on the positive semidefinite operator `-L`, started from `phi = 0`.
/// `rhs` is a divergence, so it lies in the range of `L` and the Krylov
/// iterates never pick up null-space components beyond round-off.
fn conjugate_gradient(
    rhs: &Array3<f64>,
    h: [f64; 3],
    p: &PoissonParams,
    norm_rhs: f64,
) -> (Array3<f64>, u32, f64) {
    let mut phi = Array3::<f64>::zeros(rhs.raw_dim());
    // residual of (-L) phi = -rhs at phi = 0
    let mut r = rhs.mapv(|v| -v);
    let mut dir = r.clone();
    let mut rs = dot(&r, &r);
    let check_every = p.check_every.max(1);
    let mut iterations = 0u32;
    let mut residual = f64::INFINITY;

    while iterations < p.max_iterations {
        let mut a_dir = laplacian(&dir, h);
        a_dir.mapv_inplace(|v| -v);
        let curvature = dot(&dir, &a_dir);
        if !(curvature > 0.0) || !curvature.is_finite() {
            // exact solve (dir = 0) or breakdown
            residual = relative_residual(&phi, rhs, h, norm_rhs);
            break;
        }

        let alpha = rs / curvature;
        phi.scaled_add(alpha, &dir);
        r.scaled_add(-alpha, &a_dir);
        let rs_next = dot(&r, &r);
        iterations += 1;

        let estimate = rs_next.sqrt() / norm_rhs;
        if iterations % check_every == 0 || estimate <= p.tolerance || iterations == p.max_iterations {
            residual = relative_residual(&phi, rhs, h, norm_rhs);
            if !residual.is_finite() || residual <= p.tolerance {
                break;
            }
        }

        let beta = rs_next / rs;
        Zip::from(&mut dir).and(&r).for_each(|d, &ri| *d = ri + beta * *d);
        rs = rs_next;
    }
    (phi, iterations, residual)
}

fn jacobi(rhs: &Array3<f64>, h: [f64; 3], p: &PoissonParams, norm_rhs: f64) -> (Array3<f64>, u32, f64) {
    let mut phi = Array3::<f64>::zeros(rhs.raw_dim());
    let (n1, n2, n3) = rhs.dim();
    let n = [n1, n2, n3];
    let c = h.map(|d| 1.0 / (4.0 * d * d));
    let diag = 2.0 * (c[0] + c[1] + c[2]);
    let w = p.relaxation;
    let check_every = p.check_every.max(1);

    let mut next = phi.clone();
    let mut iterations = 0u32;
    let mut residual = f64::INFINITY;

    while iterations < p.max_iterations {
        Zip::indexed(&mut next)
            .and(rhs)
            .for_each(|(i, j, k), out, &f| {
                let idx = [i, j, k];
                let mut acc = 0.0;
                for axis in 0..3 {
                    let mut pp = idx;
                    let mut mm = idx;
                    pp[axis] = wrap(pp[axis], 2, n[axis]);
                    mm[axis] = wrap(mm[axis], -2, n[axis]);
                    acc += c[axis] * (phi[pp] + phi[mm]);
                }
                let jacobi = (acc - f) / diag;
                *out = (1.0 - w) * phi[idx] + w * jacobi;
            });
        std::mem::swap(&mut phi, &mut next);
        iterations += 1;

        if iterations % check_every == 0 || iterations == p.max_iterations {
            residual = relative_residual(&phi, rhs, h, norm_rhs);
            if !residual.is_finite() || residual <= p.tolerance {
                break;
            }
        }
    }

    (phi, iterations, residual)
}
