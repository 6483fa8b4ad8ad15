/// 2π
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// 4π, the scattering-potential scale in Q = 4π sin(θ)/λ and kz² = kz₀² − 4πρ
pub const FOUR_PI: f64 = 4.0 * std::f64::consts::PI;

/// FWHM of a Gaussian divided by its standard deviation, sqrt(8 ln 2)
pub const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949_3;

/// Below this |kz| (inv Å) the reflection amplitude is pinned to -1
pub const KZ_CUTOFF: f64 = 1e-6;
