//! Ordered divisibility rules (the FizzBuzz family).
//!
//! A [`DivisorClassifier`] evaluates its rules top to bottom and returns the
//! label of the first rule whose divisors all divide the input. Rules are
//! validated on construction so that no rule can be shadowed by an earlier,
//! more general one.
//!
//! # Modulo semantics
//!
//! Divisibility uses Euclidean remainder (`i64::rem_euclid`), which is always
//! in `0..|d|`. Remainder zero means the same thing under floored or truncated
//! modulo, so negative inputs classify exactly like their absolute value:
//! `-15` is "FizzBuzz", `-9` is "Fizz".

use super::value::{Number, Value};
use crate::config::{ClassifierConfig, RuleConfig};
use crate::errors::{format_error_list, DrillError};
use serde::Serialize;
use std::fmt;
use stillwater::predicate::Predicate;

/// Predicate: the input is an exact multiple of the divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisibleBy(pub i64);

impl Predicate<i64> for DivisibleBy {
    fn check(&self, value: &i64) -> bool {
        match value.checked_rem_euclid(self.0) {
            Some(rem) => rem == 0,
            // i64::MIN % -1 overflows but is mathematically zero
            None => self.0 == -1,
        }
    }
}

/// Reals are divisible only when integral. Integral reals beyond the `i64`
/// range are tested with `f64` remainder, which is exact for them.
impl Predicate<Number> for DivisibleBy {
    fn check(&self, value: &Number) -> bool {
        if let Some(n) = value.as_exact_integer() {
            return Predicate::<i64>::check(self, &n);
        }
        match *value {
            Number::Real(x) if x.is_finite() && x.fract() == 0.0 => x % self.0 as f64 == 0.0,
            _ => false,
        }
    }
}

/// Euclidean remainder, exposed so callers can see the sign convention.
///
/// ```rust
/// use drillbook::classify::remainder;
///
/// assert_eq!(remainder(-7, 3), Some(2));
/// assert_eq!(remainder(7, 3), Some(1));
/// assert_eq!(remainder(7, 0), None);
/// ```
pub fn remainder(value: i64, divisor: i64) -> Option<i64> {
    value.checked_rem_euclid(divisor)
}

/// One rule: `label` applies when every divisor divides the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisorRule {
    pub label: String,
    pub divisors: Vec<i64>,
}

impl DivisorRule {
    pub fn new(label: impl Into<String>, divisors: impl Into<Vec<i64>>) -> Self {
        Self {
            label: label.into(),
            divisors: divisors.into(),
        }
    }

    pub fn matches(&self, value: i64) -> bool {
        self.matches_number(Number::Int(value))
    }

    pub fn matches_number(&self, value: Number) -> bool {
        self.divisors
            .iter()
            .all(|&d| Predicate::<Number>::check(&DivisibleBy(d), &value))
    }

    /// Least common multiple of the absolute divisors; `None` on overflow.
    fn modulus(&self) -> Option<u64> {
        self.divisors
            .iter()
            .map(|d| d.unsigned_abs())
            .try_fold(1u64, checked_lcm)
    }
}

impl From<&RuleConfig> for DivisorRule {
    fn from(config: &RuleConfig) -> Self {
        Self::new(config.label.clone(), config.divisors.clone())
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn checked_lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// What to return when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefaultLabel {
    /// Echo the input value back.
    #[default]
    Echo,
    /// Return a fixed string.
    Fixed(String),
}

/// Outcome of a divisibility classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Label {
    /// A rule matched; carries the rule's label.
    Rule(String),
    /// No rule matched; carries the input.
    Echo(Value),
    /// No rule matched; carries the configured fallback text.
    Fallback(String),
}

impl Label {
    pub fn rule(label: impl Into<String>) -> Self {
        Label::Rule(label.into())
    }

    /// True when no rule matched.
    pub fn is_default(&self) -> bool {
        !matches!(self, Label::Rule(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Rule(label) => write!(f, "{}", label),
            Label::Echo(value) => write!(f, "{}", value),
            Label::Fallback(text) => write!(f, "{}", text),
        }
    }
}

/// Ordered, first-match-wins rule set over integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisorClassifier {
    rules: Vec<DivisorRule>,
    default: DefaultLabel,
}

impl Default for DivisorClassifier {
    fn default() -> Self {
        Self::fizz_buzz()
    }
}

impl DivisorClassifier {
    /// The classic (3, 5) rule set: FizzBuzz, Fizz, Buzz, else echo.
    pub fn fizz_buzz() -> Self {
        Self {
            rules: vec![
                DivisorRule::new("FizzBuzz", [3, 5]),
                DivisorRule::new("Fizz", [3]),
                DivisorRule::new("Buzz", [5]),
            ],
            default: DefaultLabel::Echo,
        }
    }

    /// Build a classifier, rejecting malformed or unreachable rules.
    ///
    /// All problems are collected and reported in a single `ConfigError`.
    pub fn new(rules: Vec<DivisorRule>, default: DefaultLabel) -> Result<Self, DrillError> {
        let problems = validate_rules(&rules);
        if !problems.is_empty() {
            return Err(DrillError::config(format!(
                "invalid classifier rules:\n{}",
                format_error_list(&problems)
            )));
        }
        Ok(Self { rules, default })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, DrillError> {
        let rules = config.rules.iter().map(DivisorRule::from).collect();
        let default = match config.fallback.as_deref() {
            None | Some("") => DefaultLabel::Echo,
            Some(text) => DefaultLabel::Fixed(text.to_string()),
        };
        Self::new(rules, default)
    }

    pub fn rules(&self) -> &[DivisorRule] {
        &self.rules
    }

    /// Classify a loosely typed value; non-numeric input fails before any
    /// arithmetic happens.
    pub fn classify(&self, value: &Value) -> Result<Label, DrillError> {
        let number = value.as_number()?;
        Ok(self
            .first_match(number)
            .unwrap_or_else(|| self.fallback(value)))
    }

    pub fn classify_integer(&self, value: i64) -> Label {
        self.first_match(Number::Int(value))
            .unwrap_or_else(|| self.fallback(&Value::Int(value)))
    }

    fn first_match(&self, value: Number) -> Option<Label> {
        let rule = self.rules.iter().find(|rule| rule.matches_number(value))?;
        log::trace!("{:?} matched rule '{}'", value, rule.label);
        Some(Label::Rule(rule.label.clone()))
    }

    fn fallback(&self, value: &Value) -> Label {
        match &self.default {
            DefaultLabel::Echo => Label::Echo(value.clone()),
            DefaultLabel::Fixed(text) => Label::Fallback(text.clone()),
        }
    }
}

fn validate_rules(rules: &[DivisorRule]) -> Vec<DrillError> {
    let mut problems = Vec::new();
    let mut moduli: Vec<Option<u64>> = Vec::with_capacity(rules.len());

    for (i, rule) in rules.iter().enumerate() {
        if rule.label.trim().is_empty() {
            problems.push(DrillError::config(format!("rule {} has an empty label", i)));
        }
        if rule.divisors.is_empty() {
            problems.push(DrillError::config(format!(
                "rule '{}' has no divisors and would match every number",
                rule.label
            )));
        }
        if rule.divisors.contains(&0) {
            problems.push(DrillError::config(format!(
                "rule '{}' has a zero divisor",
                rule.label
            )));
        }

        let modulus = rule.modulus();
        if modulus.is_none() {
            problems.push(DrillError::config(format!(
                "rule '{}' divisors overflow a 64-bit modulus",
                rule.label
            )));
        }

        // Rule i matches exactly the multiples of its modulus, so it is
        // unreachable when an earlier modulus divides it.
        if let Some(m) = modulus.filter(|m| *m != 0) {
            let shadowed_by = rules[..i]
                .iter()
                .zip(&moduli)
                .find(|(_, earlier)| matches!(earlier, Some(e) if *e != 0 && m % e == 0));
            if let Some((earlier, _)) = shadowed_by {
                problems.push(DrillError::config(format!(
                    "rule '{}' is unreachable: earlier rule '{}' matches every value it would",
                    rule.label, earlier.label
                )));
            }
        }
        moduli.push(modulus);
    }

    problems
}

/// Classify with the default FizzBuzz rule set.
///
/// ```rust
/// use drillbook::classify::{classify, Label};
/// use drillbook::Value;
///
/// assert_eq!(classify(&Value::Int(30)).unwrap(), Label::rule("FizzBuzz"));
/// assert_eq!(classify(&Value::Int(7)).unwrap().to_string(), "7");
/// assert!(classify(&Value::from("x")).is_err());
/// ```
pub fn classify(value: &Value) -> Result<Label, DrillError> {
    DivisorClassifier::fizz_buzz().classify(value)
}
