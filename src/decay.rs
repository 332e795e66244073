//! Exponential half-life weighting of applications by age.

use crate::constants::decay::{FUTURE_DATED_WEIGHT, UNKNOWN_ELAPSED_WEIGHT};

/// Maps elapsed days to a weight: `exp(-ln 2 / half_life * days)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayModel {
    half_life_days: f64,
    lambda: f64,
}

impl DecayModel {
    /// Build a model for `half_life_days`. Callers validate positivity via
    /// `AggregationConfig::validate`.
    pub fn new(half_life_days: f64) -> Self {
        Self {
            half_life_days,
            lambda: std::f64::consts::LN_2 / half_life_days,
        }
    }

    pub fn half_life_days(&self) -> f64 {
        self.half_life_days
    }

    /// Decay rate per day.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Weight for an application `days_elapsed` days old.
    ///
    /// Unknown (or NaN) elapsed time yields `0.0`, future-dated applications
    /// yield exactly `1.0`, and everything else lies in `(0, 1]`.
    pub fn weight(&self, days_elapsed: Option<f64>) -> f64 {
        match days_elapsed {
            None => UNKNOWN_ELAPSED_WEIGHT,
            Some(days) if days.is_nan() => UNKNOWN_ELAPSED_WEIGHT,
            Some(days) if days < 0.0 => FUTURE_DATED_WEIGHT,
            Some(days) => (-self.lambda * days).exp(),
        }
    }
}
