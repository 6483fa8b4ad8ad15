//! Call-boundary input checks.
//!
//! Shape and domain errors are reported before any numeric work begins;
//! no kernel writes partial output.

use num_complex::Complex64;

use crate::error::{ReflError, Result};

pub(crate) fn same_len(name: &'static str, len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(ReflError::ShapeMismatch {
            name,
            len,
            expected,
        });
    }
    Ok(())
}

pub(crate) fn all_finite(name: &'static str, values: &[f64]) -> Result<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(ReflError::InvalidInput { name, index, value });
        }
    }
    Ok(())
}

/// Finite and >= 0 (thickness, roughness, resolution widths).
pub(crate) fn non_negative(name: &'static str, values: &[f64]) -> Result<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(ReflError::InvalidInput { name, index, value });
        }
    }
    Ok(())
}

/// Finite and > 0 (wavelengths).
pub(crate) fn positive(name: &'static str, values: &[f64]) -> Result<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(ReflError::InvalidInput { name, index, value });
        }
    }
    Ok(())
}

pub(crate) fn finite_scalar(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ReflError::InvalidInput {
            name,
            index: 0,
            value,
        });
    }
    Ok(())
}

pub(crate) fn non_negative_scalar(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ReflError::InvalidInput {
            name,
            index: 0,
            value,
        });
    }
    Ok(())
}

pub(crate) fn strictly_increasing(name: &'static str, values: &[f64]) -> Result<()> {
    all_finite(name, values)?;
    for (index, pair) in values.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(ReflError::NotIncreasing {
                name,
                index: index + 1,
            });
        }
    }
    Ok(())
}

/// Magnetization angle factors exp(iθ) must sit on the unit circle.
pub(crate) fn unit_modulus(name: &'static str, values: &[Complex64]) -> Result<()> {
    for (index, value) in values.iter().enumerate() {
        let norm = value.norm();
        if !norm.is_finite() || (norm - 1.0).abs() > 1e-6 {
            return Err(ReflError::InvalidInput {
                name,
                index,
                value: norm,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_len() {
        assert!(same_len("a", 3, 3).is_ok());
        let err = same_len("a", 2, 3).unwrap_err();
        assert_eq!(
            err,
            ReflError::ShapeMismatch {
                name: "a",
                len: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn test_non_negative_rejects_nan_and_negatives() {
        assert!(non_negative("d", &[0.0, 1.5]).is_ok());
        assert!(non_negative("d", &[0.0, -1.0]).is_err());
        assert!(non_negative("d", &[f64::NAN]).is_err());
        assert!(all_finite("rho", &[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(strictly_increasing("q", &[0.0, 0.1, 0.2]).is_ok());
        let err = strictly_increasing("q", &[0.0, 0.1, 0.1]).unwrap_err();
        assert_eq!(
            err,
            ReflError::NotIncreasing {
                name: "q",
                index: 2
            }
        );
    }

    #[test]
    fn test_unit_modulus() {
        let theta: f64 = 0.7;
        let ok = [Complex64::new(theta.cos(), theta.sin())];
        assert!(unit_modulus("expth", &ok).is_ok());
        assert!(unit_modulus("expth", &[Complex64::new(0.5, 0.0)]).is_err());
    }
}
