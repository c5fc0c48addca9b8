//! Error types shared across the crate.

use num_traits::{Float, ToPrimitive};
use thiserror::Error;

/// Errors surfaced while configuring a model, proposal, or sampler.
///
/// Configuration is all-or-nothing: an [`SamplerError::InvalidParameter`] is
/// returned before a single iteration can run, so a rejected configuration
/// never produces a partial trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// A configuration value violated its precondition. `name` identifies the
    /// offending parameter and `expected` states the precondition.
    #[error("invalid parameter `{name}`: expected {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, SamplerError>;

/// Checks that `value` is finite and strictly positive.
pub(crate) fn check_positive<T: Float>(name: &'static str, value: T) -> Result<()> {
    if value.is_finite() && value > T::zero() {
        Ok(())
    } else {
        Err(SamplerError::InvalidParameter {
            name,
            expected: "a finite value > 0",
            value: value.to_f64().unwrap_or(f64::NAN),
        })
    }
}

/// Checks that `value` is finite.
pub(crate) fn check_finite<T: Float>(name: &'static str, value: T) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SamplerError::InvalidParameter {
            name,
            expected: "a finite value",
            value: value.to_f64().unwrap_or(f64::NAN),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_positive_rejects_zero_negative_and_non_finite() {
        assert!(check_positive("width", 0.5).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = check_positive("width", bad).unwrap_err();
            let SamplerError::InvalidParameter { name, .. } = err;
            assert_eq!(name, "width");
        }
    }

    #[test]
    fn check_finite_rejects_nan_and_infinities() {
        assert!(check_finite("prior_mean", -3.0).is_ok());
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(check_finite("prior_mean", bad).is_err());
        }
    }

    #[test]
    fn error_message_names_the_parameter() {
        let err = check_positive("proposal_width", -2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid parameter `proposal_width`: expected a finite value > 0, got -2"
        );
    }
}
