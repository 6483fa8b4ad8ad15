//! Spin-dependent reflectivity of a magnetic layer stack.
//!
//! Each layer carries a magnetic scattering length density `p` and an
//! in-plane magnetization angle encoded as `expth = exp(iθ)`. Along the
//! layer's own magnetization axis the two spin channels decouple, with
//! scattering potentials built from ρ ± p; the coupling between
//! channels happens at interfaces where the magnetization direction
//! rotates. Writing the relative rotation as w = expth[j]·conj(expth[j+1]),
//! the eigenbasis change across the interface is the unitary
//!
//! ```text
//! U = 1/2 [ 1+w  1-w ]
//!         [ 1-w  1+w ]
//! ```
//!
//! Continuity of the spinor wavefunction and its derivative then gives
//! a 4×4 complex transfer matrix per interface acting on the up/down
//! going amplitudes of both channels, accumulated as a fold exactly
//! like the 2×2 non-magnetic recursion. With no up-going wave in the
//! substrate, each incident polarization leaves a 2×2 linear system
//! whose solution is one non-spin-flip and one spin-flip amplitude.
//!
//! When every layer shares the same magnetization direction the
//! rotation factors are all unity, the transfer matrix is block
//! diagonal, and the spin-flip channels vanish identically.

use num_complex::Complex64;

use crate::constants::{FOUR_PI, KZ_CUTOFF};
use crate::error::Result;
use crate::reflectivity::{csqrt_upper, nudge, potential};
use crate::validate;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The four spin-state reflection amplitudes, parallel to the Q input.
///
/// `uu`/`dd` are the non-spin-flip channels, `ud`/`du` the spin-flip
/// channels, named incident-state first.
#[derive(Debug, Clone)]
pub struct MagneticAmplitude {
    pub uu: Vec<Complex64>,
    pub ud: Vec<Complex64>,
    pub du: Vec<Complex64>,
    pub dd: Vec<Complex64>,
}

/// The four spin-state reflectivities |r|², parallel to the Q input.
#[derive(Debug, Clone)]
pub struct MagneticReflectivity {
    pub uu: Vec<f64>,
    pub ud: Vec<f64>,
    pub du: Vec<f64>,
    pub dd: Vec<f64>,
}

#[inline]
fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

type Mat4 = [[Complex64; 4]; 4];

const ZERO4: Mat4 = [[Complex64::new(0.0, 0.0); 4]; 4];

fn identity4() -> Mat4 {
    let mut m = ZERO4;
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = c(1.0);
    }
    m
}

fn mul4(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = ZERO4;
    for i in 0..4 {
        for j in 0..4 {
            let mut acc = Complex64::new(0.0, 0.0);
            for (k, bk) in b.iter().enumerate() {
                acc += a[i][k] * bk[j];
            }
            out[i][j] = acc;
        }
    }
    out
}

/// The four reflection amplitudes [uu, ud, du, dd] at one kz >= 0 for a
/// forward-ordered stack.
fn magnetic_point(
    kz: f64,
    lambda: f64,
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    p: &[f64],
    expth: &[Complex64],
) -> [Complex64; 4] {
    let n = rho.len();
    let zero = c(0.0);
    if n < 2 {
        return [zero; 4];
    }
    if kz.abs() < KZ_CUTOFF {
        return [c(-1.0), zero, zero, c(-1.0)];
    }

    // Reference energy uses the nuclear potential of the incident
    // medium, so an unmagnetized fronting has k = kz in both channels.
    // Fronting absorption is ignored, as in the non-magnetic kernel.
    let e0 = c(kz * kz + FOUR_PI * rho[0]);
    let channel_k = |j: usize, sign: f64| -> Complex64 {
        let mu_j = if j == 0 { 0.0 } else { mu[j] };
        nudge(csqrt_upper(
            e0 - potential(rho[j] + sign * p[j], mu_j, lambda),
        ))
    };

    let mut k_plus = channel_k(0, 1.0);
    let mut k_minus = channel_k(0, -1.0);
    let mut m = identity4();

    for i in 0..n - 1 {
        let k_plus_next = channel_k(i + 1, 1.0);
        let k_minus_next = channel_k(i + 1, -1.0);

        // Relative rotation of the magnetization between the layers.
        let w = expth[i] * expth[i + 1].conj();
        let mix = [
            [0.5 * (c(1.0) + w), 0.5 * (c(1.0) - w)],
            [0.5 * (c(1.0) - w), 0.5 * (c(1.0) + w)],
        ];

        // Phase across layer i; amplitudes are referenced at its top,
        // and the incident medium carries no phase.
        let (e_plus, e_minus) = if i > 0 {
            (
                (Complex64::i() * k_plus * d[i]).exp(),
                (Complex64::i() * k_minus * d[i]).exp(),
            )
        } else {
            (c(1.0), c(1.0))
        };

        let k_in = [k_plus, k_minus];
        let k_out = [k_plus_next, k_minus_next];
        let phase = [e_plus, e_minus];

        let mut t = ZERO4;
        for row_ch in 0..2 {
            for col_ch in 0..2 {
                let ratio = k_in[col_ch] / k_out[row_ch];
                let up = 0.5 * mix[row_ch][col_ch] * (c(1.0) + ratio);
                let down = 0.5 * mix[row_ch][col_ch] * (c(1.0) - ratio);
                let e = phase[col_ch];
                let e_inv = e.inv();
                t[2 * row_ch][2 * col_ch] = up * e;
                t[2 * row_ch][2 * col_ch + 1] = down * e_inv;
                t[2 * row_ch + 1][2 * col_ch] = down * e;
                t[2 * row_ch + 1][2 * col_ch + 1] = up * e_inv;
            }
        }

        m = mul4(&t, &m);
        k_plus = k_plus_next;
        k_minus = k_minus_next;
    }

    // Substrate has no up-going wave in either channel: rows 1 and 3 of
    // m·x₀ vanish, a 2×2 system per incident polarization.
    let a = m[1][1];
    let b = m[1][3];
    let g = m[3][1];
    let h = m[3][3];
    let det = a * h - b * g;

    let r_uu = (b * m[3][0] - h * m[1][0]) / det;
    let r_ud = (g * m[1][0] - a * m[3][0]) / det;
    let r_du = (b * m[3][2] - h * m[1][2]) / det;
    let r_dd = (g * m[1][2] - a * m[3][2]) / det;

    [r_uu, r_ud, r_du, r_dd]
}

fn check_magnetic_profile(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    p: &[f64],
    expth: &[Complex64],
    lambda: &[f64],
    q: &[f64],
) -> Result<()> {
    let n = rho.len();
    validate::all_finite("rho", rho)?;
    validate::all_finite("mu", mu)?;
    validate::non_negative("d", d)?;
    validate::all_finite("p", p)?;
    validate::same_len("mu", mu.len(), n)?;
    validate::same_len("d", d.len(), n)?;
    validate::same_len("p", p.len(), n)?;
    validate::same_len("expth", expth.len(), n)?;
    validate::unit_modulus("expth", expth)?;
    validate::positive("lambda", lambda)?;
    validate::all_finite("q", q)?;
    validate::same_len("lambda", lambda.len(), q.len())?;
    Ok(())
}

/// The four spin-dependent reflection amplitudes of a magnetic stack.
///
/// # Arguments
/// * `rho` - nuclear scattering length density per layer (inv Å²)
/// * `mu` - absorption coefficient per layer
/// * `d` - thickness per layer (Å); first and last entries are ignored
/// * `p` - magnetic scattering length density per layer (inv Å²)
/// * `expth` - exp(iθ) of the in-plane magnetization angle per layer
/// * `lambda` - wavelength per output point (Å)
/// * `q` - wavevector transfer per output point (inv Å)
pub fn magnetic_amplitude(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    p: &[f64],
    expth: &[Complex64],
    lambda: &[f64],
    q: &[f64],
) -> Result<MagneticAmplitude> {
    check_magnetic_profile(rho, mu, d, p, expth, lambda, q)?;

    struct Reversed {
        rho: Vec<f64>,
        mu: Vec<f64>,
        d: Vec<f64>,
        p: Vec<f64>,
        expth: Vec<Complex64>,
    }
    let reversed = if q.iter().any(|&x| x < 0.0) {
        Some(Reversed {
            rho: rho.iter().rev().copied().collect(),
            mu: mu.iter().rev().copied().collect(),
            d: d.iter().rev().copied().collect(),
            p: p.iter().rev().copied().collect(),
            expth: expth.iter().rev().copied().collect(),
        })
    } else {
        None
    };

    let point = |k: usize| -> [Complex64; 4] {
        let kz = 0.5 * q[k];
        match (&reversed, kz < 0.0) {
            (Some(rev), true) => magnetic_point(
                -kz,
                lambda[k],
                &rev.rho,
                &rev.mu,
                &rev.d,
                &rev.p,
                &rev.expth,
            ),
            _ => magnetic_point(kz, lambda[k], rho, mu, d, p, expth),
        }
    };

    #[cfg(feature = "parallel")]
    let all: Vec<[Complex64; 4]> = (0..q.len()).into_par_iter().map(point).collect();
    #[cfg(not(feature = "parallel"))]
    let all: Vec<[Complex64; 4]> = (0..q.len()).map(point).collect();

    let mut out = MagneticAmplitude {
        uu: Vec::with_capacity(q.len()),
        ud: Vec::with_capacity(q.len()),
        du: Vec::with_capacity(q.len()),
        dd: Vec::with_capacity(q.len()),
    };
    for [uu, ud, du, dd] in all {
        out.uu.push(uu);
        out.ud.push(ud);
        out.du.push(du);
        out.dd.push(dd);
    }
    Ok(out)
}

/// The four spin-dependent reflectivities |r|² of a magnetic stack.
///
/// Takes the same arguments as [`magnetic_amplitude`].
pub fn magnetic_reflectivity(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    p: &[f64],
    expth: &[Complex64],
    lambda: &[f64],
    q: &[f64],
) -> Result<MagneticReflectivity> {
    let amplitude = magnetic_amplitude(rho, mu, d, p, expth, lambda, q)?;
    Ok(MagneticReflectivity {
        uu: amplitude.uu.iter().map(|r| r.norm_sqr()).collect(),
        ud: amplitude.ud.iter().map(|r| r.norm_sqr()).collect(),
        du: amplitude.du.iter().map(|r| r.norm_sqr()).collect(),
        dd: amplitude.dd.iter().map(|r| r.norm_sqr()).collect(),
    })
}
