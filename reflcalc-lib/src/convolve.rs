//! Resolution smearing of a reflectivity curve.
//!
//! Smears a finely sampled curve (qi, ri) with a Gaussian kernel whose
//! width varies per output point, producing the curve an instrument of
//! that resolution would record.

use crate::error::{ReflError, Result};
use crate::validate;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Half-width of the summation window in units of dq.
///
/// exp(-18) ~ 1.5e-8, so truncating the kernel at 6 sigma keeps the
/// truncated sum within ~1e-7 of the full-range definition.
const WINDOW_SIGMA: f64 = 6.0;

/// Gaussian resolution smearing with per-point width.
///
/// For each output point k, returns the Gaussian-weighted average of
/// `ri` over `qi` with kernel center `q[k]` and standard deviation
/// `dq[k]`:
///
/// ```text
/// r[k] = sum_j ri[j] w_j / sum_j w_j,   w_j = exp(-(qi[j]-q[k])² / (2 dq[k]²))
/// ```
///
/// Points with `dq[k] == 0` fall back to linear interpolation of the
/// raw curve, clamped to the boundary values outside the `qi` range.
/// The same clamped interpolation is used when the Gaussian window
/// contains no raw samples at all, so output points beyond the sampled
/// range are always well defined.
///
/// # Arguments
/// * `qi` - raw curve abscissa, strictly increasing (length M > 0)
/// * `ri` - raw reflectivity at `qi` (length M)
/// * `q` - output points (length N)
/// * `dq` - 1-sigma resolution width per output point (length N, >= 0)
pub fn convolve(qi: &[f64], ri: &[f64], q: &[f64], dq: &[f64]) -> Result<Vec<f64>> {
    validate::strictly_increasing("qi", qi)?;
    validate::all_finite("ri", ri)?;
    validate::same_len("ri", ri.len(), qi.len())?;
    validate::all_finite("q", q)?;
    validate::non_negative("dq", dq)?;
    validate::same_len("dq", dq.len(), q.len())?;
    if qi.is_empty() && !q.is_empty() {
        return Err(ReflError::Empty { name: "qi" });
    }

    let point = |k: usize| convolve_point(qi, ri, q[k], dq[k]);

    #[cfg(feature = "parallel")]
    let r = (0..q.len()).into_par_iter().map(point).collect();
    #[cfg(not(feature = "parallel"))]
    let r = (0..q.len()).map(point).collect();

    Ok(r)
}

fn convolve_point(qi: &[f64], ri: &[f64], center: f64, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return interp_clamped(qi, ri, center);
    }

    let lo = qi.partition_point(|&x| x < center - WINDOW_SIGMA * sigma);
    let hi = qi.partition_point(|&x| x <= center + WINDOW_SIGMA * sigma);

    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weighted = 0.0;
    let mut weight = 0.0;
    for j in lo..hi {
        let z = qi[j] - center;
        let w = (-z * z / two_sigma_sq).exp();
        weighted += ri[j] * w;
        weight += w;
    }

    if weight > 0.0 {
        weighted / weight
    } else {
        // Window cleared the sampled range entirely; extrapolate with
        // the nearest boundary value.
        interp_clamped(qi, ri, center)
    }
}

/// Linear interpolation clamped to the boundary values.
fn interp_clamped(qi: &[f64], ri: &[f64], x: f64) -> f64 {
    if x <= qi[0] {
        return ri[0];
    }
    let last = qi.len() - 1;
    if x >= qi[last] {
        return ri[last];
    }
    let hi = qi.partition_point(|&v| v < x);
    let lo = hi - 1;
    let t = (x - qi[lo]) / (qi[hi] - qi[lo]);
    ri[lo] + t * (ri[hi] - ri[lo])
}
