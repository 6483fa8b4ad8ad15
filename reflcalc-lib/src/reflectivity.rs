//! Optical-matrix reflectivity of a stratified, non-magnetic sample.
//!
//! The classic Abelès treatment: each output point gets a perpendicular
//! wavevector kz = Q/2 in the incident medium; inside layer j the
//! wavevector follows from the layer's complex scattering potential
//! 4πρ - 2πiμ/λ, referenced to the incident medium so that k₀ = kz
//! exactly. Per-interface Fresnel coefficients and per-layer phase
//! factors combine into a 2×2 characteristic matrix accumulated as a
//! fold over the interfaces, and the reflection amplitude is read off
//! the final matrix. Layers are ordered incident medium → substrate;
//! the first and last thicknesses are ignored (semi-infinite media).
//!
//! Negative Q probes the sample from the back, handled by reversing the
//! layer stack. |kz| below [`KZ_CUTOFF`](crate::constants::KZ_CUTOFF)
//! pins the amplitude to -1 (total reflection at grazing incidence).

use num_complex::Complex64;

use crate::constants::{FOUR_PI, KZ_CUTOFF, TWO_PI};
use crate::error::Result;
use crate::validate;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Convert f64 to Complex64 (real part only).
#[inline]
fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// Complex square root on the branch with non-negative imaginary part.
///
/// An evanescent or absorbed wave must decay into the stack, never
/// grow, which pins every layer wavevector to the closed upper half
/// plane. Principal-branch conventions differ between math libraries,
/// so the choice is made explicit here rather than inherited.
#[inline]
pub(crate) fn csqrt_upper(z: Complex64) -> Complex64 {
    let root = z.sqrt();
    if root.im < 0.0 { -root } else { root }
}

/// Complex scattering potential of a layer, 4πρ - 2πiμ/λ.
#[inline]
pub(crate) fn potential(rho: f64, mu: f64, lambda: f64) -> Complex64 {
    Complex64::new(FOUR_PI * rho, -TWO_PI * mu / lambda)
}

/// Keep a layer wavevector away from exact zero so Fresnel ratios stay
/// finite at a numerically exact critical edge.
#[inline]
pub(crate) fn nudge(k: Complex64) -> Complex64 {
    if k.norm_sqr() == 0.0 {
        Complex64::new(0.0, 1e-30)
    } else {
        k
    }
}

/// 2×2 complex wave-transfer matrix, the fold accumulator.
#[derive(Debug, Clone, Copy)]
struct Transfer2 {
    t11: Complex64,
    t12: Complex64,
    t21: Complex64,
    t22: Complex64,
}

impl Transfer2 {
    const IDENTITY: Transfer2 = Transfer2 {
        t11: Complex64::new(1.0, 0.0),
        t12: Complex64::new(0.0, 0.0),
        t21: Complex64::new(0.0, 0.0),
        t22: Complex64::new(1.0, 0.0),
    };

    /// Matrix for one interface: propagate across the layer above it
    /// (phase e = exp(i k t), unity for the incident medium) and match
    /// waves through the interface with Fresnel coefficient f. A common
    /// scalar prefactor is dropped; it cancels in the amplitude ratio.
    fn interface(f: Complex64, e: Complex64) -> Transfer2 {
        let e_inv = e.inv();
        Transfer2 {
            t11: e,
            t12: -f * e_inv,
            t21: -f * e,
            t22: e_inv,
        }
    }

    /// Left-multiply by `next`, the accumulation step of the fold.
    fn then(self, next: Transfer2) -> Transfer2 {
        Transfer2 {
            t11: next.t11 * self.t11 + next.t12 * self.t21,
            t12: next.t11 * self.t12 + next.t12 * self.t22,
            t21: next.t21 * self.t11 + next.t22 * self.t21,
            t22: next.t21 * self.t12 + next.t22 * self.t22,
        }
    }
}

/// Reflection amplitude at a single kz >= 0 for a forward-ordered stack.
fn amplitude_point(
    kz: f64,
    lambda: f64,
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    sigma: Option<&[f64]>,
) -> Complex64 {
    let n = rho.len();
    if n < 2 {
        // No interface, nothing to reflect from.
        return c(0.0);
    }
    if kz.abs() < KZ_CUTOFF {
        return c(-1.0);
    }

    // Reference energy relative to the incident medium, so k = kz there.
    // Fronting absorption is ignored: it belongs to the beam path, not
    // the interference in the stack, and keeping it in the reference
    // would push layer wavevectors out of the decaying quadrant.
    let e0 = c(kz * kz + FOUR_PI * rho[0]);

    let mut k = c(kz);
    let mut m = Transfer2::IDENTITY;
    for i in 0..n - 1 {
        let k_next = nudge(csqrt_upper(e0 - potential(rho[i + 1], mu[i + 1], lambda)));
        let mut f = (k - k_next) / (k + k_next);
        if let Some(sigma) = sigma {
            // Nevot-Croce attenuation for a Gaussian interface profile.
            f *= (-2.0 * k * k_next * sigma[i] * sigma[i]).exp();
        }
        let e = if i > 0 {
            (Complex64::i() * k * d[i]).exp()
        } else {
            c(1.0)
        };
        m = m.then(Transfer2::interface(f, e));
        k = k_next;
    }

    // No up-going wave in the substrate.
    -m.t21 / m.t22
}

fn check_profile(rho: &[f64], mu: &[f64], d: &[f64], lambda: &[f64], q: &[f64]) -> Result<()> {
    let n = rho.len();
    validate::all_finite("rho", rho)?;
    validate::all_finite("mu", mu)?;
    validate::non_negative("d", d)?;
    validate::same_len("mu", mu.len(), n)?;
    validate::same_len("d", d.len(), n)?;
    validate::positive("lambda", lambda)?;
    validate::all_finite("q", q)?;
    validate::same_len("lambda", lambda.len(), q.len())?;
    Ok(())
}

/// Per-interface roughness: n-1 entries, or n with the last ignored.
fn check_sigma<'a>(sigma: &'a [f64], n: usize) -> Result<&'a [f64]> {
    validate::non_negative("sigma", sigma)?;
    let interfaces = n.saturating_sub(1);
    if sigma.len() == n {
        Ok(&sigma[..interfaces])
    } else {
        validate::same_len("sigma", sigma.len(), interfaces)?;
        Ok(sigma)
    }
}

/// Reversed copy of the profile for back-reflectivity (Q < 0) points.
/// The interface array is one shorter than the layer arrays, so its
/// reversal drops the unused final slot rather than the first interface.
struct ReversedProfile {
    rho: Vec<f64>,
    mu: Vec<f64>,
    d: Vec<f64>,
    sigma: Option<Vec<f64>>,
}

fn reverse_profile(rho: &[f64], mu: &[f64], d: &[f64], sigma: Option<&[f64]>) -> ReversedProfile {
    ReversedProfile {
        rho: rho.iter().rev().copied().collect(),
        mu: mu.iter().rev().copied().collect(),
        d: d.iter().rev().copied().collect(),
        sigma: sigma.map(|s| s.iter().rev().copied().collect()),
    }
}

fn run(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    sigma: Option<&[f64]>,
    lambda: &[f64],
    q: &[f64],
) -> Result<Vec<Complex64>> {
    check_profile(rho, mu, d, lambda, q)?;
    let sigma = match sigma {
        Some(s) => Some(check_sigma(s, rho.len())?),
        None => None,
    };

    let reversed = if q.iter().any(|&x| x < 0.0) {
        Some(reverse_profile(rho, mu, d, sigma))
    } else {
        None
    };

    let point = |k: usize| -> Complex64 {
        let kz = 0.5 * q[k];
        match (&reversed, kz < 0.0) {
            (Some(rev), true) => amplitude_point(
                -kz,
                lambda[k],
                &rev.rho,
                &rev.mu,
                &rev.d,
                rev.sigma.as_deref(),
            ),
            _ => amplitude_point(kz, lambda[k], rho, mu, d, sigma),
        }
    };

    #[cfg(feature = "parallel")]
    let r = (0..q.len()).into_par_iter().map(point).collect();
    #[cfg(not(feature = "parallel"))]
    let r = (0..q.len()).map(point).collect();

    Ok(r)
}

/// Complex reflection amplitude r(Q) for a smooth layer stack.
///
/// # Arguments
/// * `rho` - scattering length density per layer (inv Å²)
/// * `mu` - absorption coefficient per layer
/// * `d` - thickness per layer (Å); first and last entries are ignored
/// * `lambda` - wavelength per output point (Å)
/// * `q` - wavevector transfer per output point (inv Å)
pub fn reflectivity_amplitude(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    lambda: &[f64],
    q: &[f64],
) -> Result<Vec<Complex64>> {
    run(rho, mu, d, None, lambda, q)
}

/// Reflectivity |r(Q)|² for a smooth layer stack.
pub fn reflectivity(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    lambda: &[f64],
    q: &[f64],
) -> Result<Vec<f64>> {
    let amplitude = run(rho, mu, d, None, lambda, q)?;
    Ok(amplitude.iter().map(|r| r.norm_sqr()).collect())
}

/// Complex reflection amplitude with Nevot-Croce interfacial roughness.
///
/// `sigma[i]` is the RMS roughness (Å) of the interface between layers
/// i and i+1; it may hold one entry per interface or one per layer with
/// the final entry ignored. All-zero roughness reproduces
/// [`reflectivity_amplitude`] exactly.
pub fn reflectivity_amplitude_rough(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    sigma: &[f64],
    lambda: &[f64],
    q: &[f64],
) -> Result<Vec<Complex64>> {
    run(rho, mu, d, Some(sigma), lambda, q)
}

/// Reflectivity |r(Q)|² with Nevot-Croce interfacial roughness.
pub fn reflectivity_rough(
    rho: &[f64],
    mu: &[f64],
    d: &[f64],
    sigma: &[f64],
    lambda: &[f64],
    q: &[f64],
) -> Result<Vec<f64>> {
    let amplitude = run(rho, mu, d, Some(sigma), lambda, q)?;
    Ok(amplitude.iter().map(|r| r.norm_sqr()).collect())
}
