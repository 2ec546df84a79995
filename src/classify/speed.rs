//! Speed-check classification.
//!
//! Every full `increment` above the limit counts as one penalty unit; reaching
//! the suspension threshold suspends the licence.

use super::value::Value;
use crate::config::SpeedConfig;
use crate::errors::DrillError;
use serde::Serialize;
use std::fmt;
use stillwater::predicate::*;

/// Number of penalty units at which the licence is suspended.
pub const DEFAULT_SUSPENSION_THRESHOLD: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpeedLabel {
    WithinLimit,
    Points { units: i64 },
    Suspended,
}

impl fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedLabel::WithinLimit => write!(f, "within limit"),
            SpeedLabel::Points { units } => write!(f, "points: {}", units),
            SpeedLabel::Suspended => write!(f, "suspended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedClassifier {
    limit: f64,
    increment: f64,
    suspension_threshold: i64,
}

impl SpeedClassifier {
    /// `limit` and `increment` must both be positive and finite.
    pub fn new(limit: f64, increment: f64) -> Result<Self, DrillError> {
        ensure_positive("limit", limit)?;
        ensure_positive("increment", increment)?;
        Ok(Self {
            limit,
            increment,
            suspension_threshold: DEFAULT_SUSPENSION_THRESHOLD,
        })
    }

    pub fn with_suspension_threshold(mut self, threshold: i64) -> Result<Self, DrillError> {
        if !gt(0_i64).check(&threshold) {
            return Err(DrillError::invalid_argument(format!(
                "suspension threshold must be at least 1, got {}",
                threshold
            )));
        }
        self.suspension_threshold = threshold;
        Ok(self)
    }

    pub fn from_config(config: &SpeedConfig) -> Result<Self, DrillError> {
        Self::new(config.limit, config.increment)?
            .with_suspension_threshold(config.suspension_threshold)
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn suspension_threshold(&self) -> i64 {
        self.suspension_threshold
    }

    /// `floor((value - limit) / increment)`; negative below the limit.
    ///
    /// NaN and infinities are rejected rather than cast to a unit count.
    pub fn penalty_units(&self, value: f64) -> Result<i64, DrillError> {
        let value = Value::Real(value).as_number()?.as_f64();
        Ok(((value - self.limit) / self.increment).floor() as i64)
    }

    pub fn classify(&self, value: &Value) -> Result<SpeedLabel, DrillError> {
        let speed = value.as_number()?.as_f64();
        self.classify_speed(speed)
    }

    /// Penalty units are computed before any branch is taken, so the
    /// boundary `value == limit` goes through the same arithmetic as every
    /// other input.
    pub fn classify_speed(&self, value: f64) -> Result<SpeedLabel, DrillError> {
        let units = self.penalty_units(value)?;
        let within_limit = le(self.limit);
        let suspended = ge(self.suspension_threshold);

        let label = if within_limit.check(&value) {
            SpeedLabel::WithinLimit
        } else if suspended.check(&units) {
            SpeedLabel::Suspended
        } else {
            SpeedLabel::Points { units }
        };
        log::trace!("speed {} ({} units) -> {}", value, units, label);
        Ok(label)
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<(), DrillError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DrillError::invalid_argument(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Classify a speed against `limit` with one penalty unit per `increment`.
///
/// ```rust
/// use drillbook::classify::{classify_speed, SpeedLabel};
/// use drillbook::Value;
///
/// assert_eq!(classify_speed(&Value::Int(195), 80.0, 5.0).unwrap(), SpeedLabel::Suspended);
/// assert_eq!(classify_speed(&Value::Int(80), 80.0, 5.0).unwrap(), SpeedLabel::WithinLimit);
/// ```
pub fn classify_speed(
    value: &Value,
    limit: f64,
    increment: f64,
) -> Result<SpeedLabel, DrillError> {
    SpeedClassifier::new(limit, increment)?.classify(value)
}
