//! Numeric classifiers built from ordered, first-match-wins rules.
//!
//! - [`DivisorClassifier`] / [`classify`]: FizzBuzz-style divisibility labels
//! - [`SpeedClassifier`] / [`classify_speed`]: penalty units over a limit
//!
//! Both accept a [`Value`] and reject non-numeric input with
//! `DrillError::InvalidInputKind` before doing any arithmetic.

pub mod rules;
pub mod speed;
pub mod value;

pub use rules::{
    classify, remainder, DefaultLabel, DivisibleBy, DivisorClassifier, DivisorRule, Label,
};
pub use speed::{classify_speed, SpeedClassifier, SpeedLabel, DEFAULT_SUSPENSION_THRESHOLD};
pub use value::{Number, Value};
