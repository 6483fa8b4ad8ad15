//! Instrument Q-resolution estimation.
//!
//! Given Q = 4π sin(θ)/λ, the uncertainty in Q follows from the
//! wavelength dispersion dλ/λ and the angular divergence dθ by
//! propagation of errors:
//!
//! ```text
//! (dQ/Q)² = (dλ/λ)² + (dθ/tan θ)²
//! ```
//!
//! 1/tan(θ) diverges at θ = 0, so the kernels use the equivalent direct
//! form
//!
//! ```text
//! dQ = (4π/λ) sqrt( sin²θ (dλ/λ)² + cos²θ dθ² )
//! ```
//!
//! which stays finite through Q = 0. Scanning (monochromatic)
//! instruments hold the slits fixed at low angle and open them with θ
//! above some threshold; time-of-flight instruments bin wavelength at
//! constant dλ/λ. Both geometries reduce to the two kernels below, plus
//! the slit-geometry helpers for deriving dθ from the collimation.
//!
//! All angles are in radians. The dλ/λ, dθ and dθ/θ widths pass through
//! linearly, so the caller may supply either FWHM or 1-sigma widths and
//! gets dQ back in the same convention; [`fwhm_to_sigma`] and
//! [`sigma_to_fwhm`] convert between the two.

use crate::constants::{FOUR_PI, FWHM_PER_SIGMA};
use crate::error::{ReflError, Result};
use crate::validate;

/// Q from grazing angle (radians) and wavelength (Å): Q = 4π sin(θ)/λ.
#[inline]
pub fn theta_to_q(theta: f64, lambda: f64) -> f64 {
    FOUR_PI * theta.sin() / lambda
}

/// Grazing angle (radians) from Q and wavelength; NaN if |Q|λ/4π > 1.
#[inline]
pub fn q_to_theta(q: f64, lambda: f64) -> f64 {
    (q * lambda / FOUR_PI).asin()
}

/// Convert a FWHM width to the 1-sigma width of the same Gaussian.
#[inline]
pub fn fwhm_to_sigma(fwhm: f64) -> f64 {
    fwhm / FWHM_PER_SIGMA
}

/// Convert a 1-sigma width to FWHM.
#[inline]
pub fn sigma_to_fwhm(sigma: f64) -> f64 {
    sigma * FWHM_PER_SIGMA
}

fn check_q_lambda(lambda: &[f64], q: &[f64]) -> Result<()> {
    validate::positive("lambda", lambda)?;
    validate::all_finite("q", q)?;
    validate::same_len("lambda", lambda.len(), q.len())?;
    // Every point must map back to a real scattering angle.
    for (index, (&qk, &lk)) in q.iter().zip(lambda).enumerate() {
        if (qk * lk).abs() > FOUR_PI {
            return Err(ReflError::InvalidInput {
                name: "q",
                index,
                value: qk,
            });
        }
    }
    Ok(())
}

/// Resolution for fixed slit openings.
///
/// The angular divergence `dt` (radians) is constant across the scan;
/// `dlol` is the relative wavelength spread dλ/λ. Wavelength may vary
/// per point for polychromatic instruments. At Q = 0 the result is the
/// finite limit 4π·dt/λ rather than a division fault.
///
/// # Arguments
/// * `lambda` - wavelength per point (Å)
/// * `dlol` - relative wavelength spread dλ/λ
/// * `dt` - angular divergence (radians)
/// * `q` - wavevector transfer per point (inv Å)
pub fn fixed_slit_resolution(lambda: &[f64], dlol: f64, dt: f64, q: &[f64]) -> Result<Vec<f64>> {
    check_q_lambda(lambda, q)?;
    validate::non_negative_scalar("dlol", dlol)?;
    validate::non_negative_scalar("dt", dt)?;

    Ok(q.iter()
        .zip(lambda)
        .map(|(&qk, &lk)| {
            let sin_t = (qk * lk / FOUR_PI).abs();
            let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
            let wavelength_term = sin_t * dlol;
            let angle_term = cos_t * dt;
            FOUR_PI / lk * (wavelength_term * wavelength_term + angle_term * angle_term).sqrt()
        })
        .collect())
}

/// Resolution for slits opening with angle.
///
/// In the opening-slits region dθ/θ is held constant, so the divergence
/// enters as the fractional spread `dtot` and the quadrature sum scales
/// directly with Q:  dQ = |Q| sqrt((dλ/λ)² + (dθ/θ)²).
///
/// # Arguments
/// * `lambda` - wavelength per point (Å)
/// * `dlol` - relative wavelength spread dλ/λ
/// * `dtot` - fractional angular spread dθ/θ
/// * `q` - wavevector transfer per point (inv Å)
pub fn varying_slit_resolution(lambda: &[f64], dlol: f64, dtot: f64, q: &[f64]) -> Result<Vec<f64>> {
    check_q_lambda(lambda, q)?;
    validate::non_negative_scalar("dlol", dlol)?;
    validate::non_negative_scalar("dtot", dtot)?;

    let width = (dlol * dlol + dtot * dtot).sqrt();
    Ok(q.iter().map(|&qk| qk.abs() * width).collect())
}

/// Logarithmically spaced wavelength bin centers preserving dλ/λ.
///
/// Builds time-of-flight bins from `low` to `high` Å with edges in
/// constant ratio 1 + dλ/λ, returning the bin centers.
pub fn bins(low: f64, high: f64, dlol: f64) -> Result<Vec<f64>> {
    validate::finite_scalar("low", low)?;
    validate::finite_scalar("high", high)?;
    if low <= 0.0 || high <= low {
        return Err(ReflError::InvalidInput {
            name: "low",
            index: 0,
            value: low,
        });
    }
    if !dlol.is_finite() || dlol <= 0.0 {
        return Err(ReflError::InvalidInput {
            name: "dlol",
            index: 0,
            value: dlol,
        });
    }

    let step = 1.0 + dlol;
    let n = ((high / low).ln() / step.ln()).ceil() as usize;
    let edges: Vec<f64> = (0..=n).map(|i| low * step.powi(i as i32)).collect();
    Ok(edges.windows(2).map(|e| 0.5 * (e[0] + e[1])).collect())
}

/// Bin widths for logarithmically binned TOF wavelength centers.
///
/// Assumes `l` holds the centers of bins with edges in constant ratio
/// 1 + dλ/λ, as produced by [`bins`] or a TOF reduction; then
/// dλ = 2 dλ/λ / (2 + dλ/λ) · λ. The centers may run in either
/// direction.
pub fn binwidths(l: &[f64]) -> Result<Vec<f64>> {
    validate::positive("l", l)?;
    if l.len() < 2 {
        return Err(ReflError::ShapeMismatch {
            name: "l",
            len: l.len(),
            expected: 2,
        });
    }
    let dlol = if l[1] > l[0] {
        l[1] / l[0] - 1.0
    } else {
        l[0] / l[1] - 1.0
    };
    let scale = 2.0 * dlol / (2.0 + dlol);
    Ok(l.iter().map(|&lk| scale * lk).collect())
}

/// Angular divergence of a two-slit collimator, per incident angle.
///
/// The slit contribution is (s1+s2)/(2(d1-d2)) with `s1`, `s2` the slit
/// openings (mm) and `d1`, `d2` the slit-to-sample distances (mm,
/// d1 > d2). When the projection of the sample into the beam,
/// w·sin(θ), is smaller than slit 2, the sample itself acts as the
/// second slit and (s1 + w·sinθ)/(2 d1) is used instead.
/// `sample_broadening` (radians, from sample warp as read off a rocking
/// curve) is added to every point.
pub fn divergence(
    theta: &[f64],
    slits: (f64, f64),
    distance: (f64, f64),
    sample_width: f64,
    sample_broadening: f64,
) -> Result<Vec<f64>> {
    let (s1, s2) = slits;
    let (d1, d2) = distance;
    validate::all_finite("theta", theta)?;
    validate::non_negative_scalar("s1", s1)?;
    validate::non_negative_scalar("s2", s2)?;
    validate::finite_scalar("d2", d2)?;
    validate::finite_scalar("sample_broadening", sample_broadening)?;
    validate::non_negative_scalar("sample_width", sample_width)?;
    if !d1.is_finite() || d1 <= 0.0 || d1 <= d2 {
        return Err(ReflError::InvalidInput {
            name: "d1",
            index: 0,
            value: d1,
        });
    }

    let slit_dt = (s1 + s2) / (2.0 * (d1 - d2));
    Ok(theta
        .iter()
        .map(|&t| {
            let projection = sample_width * t.sin().abs();
            let dt = if projection < s2 {
                (s1 + projection) / (2.0 * d1)
            } else {
                slit_dt
            };
            dt + sample_broadening
        })
        .collect())
}

/// Slit openings for the fixed-opening-fixed scan pattern.
///
/// Scanning reflectometers keep the slits fixed below `tlo`, open them
/// proportionally to θ between `tlo` and `thi` (holding dθ/θ constant),
/// and fix them again above `thi`. Openings are recorded at `tlo`;
/// `slits_below`/`slits_above` default to the fixed-region values
/// implied by `slits_at_tlo`. Pass `thi = f64::INFINITY` when the slits
/// never stop opening. Returns one (s1, s2) pair per angle.
pub fn opening_slits(
    theta: &[f64],
    slits_at_tlo: (f64, f64),
    tlo: f64,
    thi: f64,
    slits_below: Option<(f64, f64)>,
    slits_above: Option<(f64, f64)>,
) -> Result<Vec<(f64, f64)>> {
    let (m1, m2) = slits_at_tlo;
    validate::all_finite("theta", theta)?;
    validate::non_negative_scalar("s1", m1)?;
    validate::non_negative_scalar("s2", m2)?;
    if !(tlo > 0.0) {
        return Err(ReflError::InvalidInput {
            name: "tlo",
            index: 0,
            value: tlo,
        });
    }
    if !(thi >= tlo) {
        return Err(ReflError::InvalidInput {
            name: "thi",
            index: 0,
            value: thi,
        });
    }

    let (b1, b2) = slits_below.unwrap_or(slits_at_tlo);
    let (t1, t2) = slits_above.unwrap_or((m1 * thi / tlo, m2 * thi / tlo));

    Ok(theta
        .iter()
        .map(|&t| {
            let t = t.abs();
            if t < tlo {
                (b1, b2)
            } else if t <= thi {
                (m1 * t / tlo, m2 * t / tlo)
            } else {
                (t1, t2)
            }
        })
        .collect())
}
