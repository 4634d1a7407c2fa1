//! Outlier rejection thresholds.
//!
//! Multipliers of the standard deviation used by each filter pass. They
//! are tuning knobs for OCR noise, not physical constants.

use serde::{Deserialize, Serialize};

/// Standard-deviation multipliers for the outlier filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterThresholds {
    /// Multiplier for latitude/longitude magnitudes and their deltas.
    pub position_k: f64,
    /// Multiplier for speed magnitudes.
    pub speed_k: f64,
    /// Widens the delta band for short trips: `k · (1 + c / n)`.
    pub small_sample_constant: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            position_k: 2.0,
            speed_k: 3.0,
            small_sample_constant: 100.0,
        }
    }
}

impl FilterThresholds {
    /// Delta-pass multiplier for a table of `rows` rows.
    pub fn delta_k(&self, rows: usize) -> f64 {
        if rows == 0 {
            return self.position_k;
        }
        self.position_k * (1.0 + self.small_sample_constant / rows as f64)
    }

    /// Checks that all multipliers are finite and usable.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [("position_k", self.position_k), ("speed_k", self.speed_k)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ThresholdError::NonPositive { name, value });
            }
        }
        if !self.small_sample_constant.is_finite() || self.small_sample_constant < 0.0 {
            return Err(ThresholdError::Negative {
                name: "small_sample_constant",
                value: self.small_sample_constant,
            });
        }
        Ok(())
    }
}

/// Invalid threshold values.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ThresholdError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be zero or positive, got {value}")]
    Negative { name: &'static str, value: f64 },
}
