//! Reflectometry kernels for layered and magnetic thin-film samples.
//!
//! Computes simulated neutron/X-ray reflectivity curves for stratified
//! samples and applies instrumental resolution smearing:
//!
//! - [`reflectivity`] / [`reflectivity_rough`] — optical-matrix
//!   reflectivity of a non-magnetic layer stack, optionally with
//!   Nevot-Croce interfacial roughness.
//! - [`magnetic_reflectivity`] — the four spin-dependent reflectivities
//!   of a magnetic stack.
//! - [`fixed_slit_resolution`] / [`varying_slit_resolution`] — per-point
//!   Q resolution from instrument geometry, with slit-schedule and TOF
//!   binning helpers in [`resolution`].
//! - [`convolve`] — Gaussian resolution smearing with per-point width.
//! - [`erf`] — vectorised error function.
//!
//! All kernels are pure functions over flat numeric slices: inputs are
//! borrowed for the duration of the call, results are returned as owned
//! vectors, and no state survives between calls. Enable the `parallel`
//! feature to spread the per-point loops across threads with rayon.

pub mod constants;
pub mod convolve;
pub mod erf;
pub mod error;
pub mod magnetic;
pub mod reflectivity;
pub mod resolution;
pub(crate) mod validate;

pub use convolve::convolve;
pub use erf::{erf, erf_scalar};
pub use error::{ReflError, Result};
pub use magnetic::{
    MagneticAmplitude, MagneticReflectivity, magnetic_amplitude, magnetic_reflectivity,
};
pub use reflectivity::{
    reflectivity, reflectivity_amplitude, reflectivity_amplitude_rough, reflectivity_rough,
};
pub use resolution::{
    bins, binwidths, divergence, fixed_slit_resolution, fwhm_to_sigma, opening_slits, q_to_theta,
    sigma_to_fwhm, theta_to_q, varying_slit_resolution,
};
