use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_SUSPENSION_THRESHOLD;
use crate::pipeline::DEFAULT_TAG;

/// Root configuration structure for drillbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DrillbookConfig {
    /// Divisibility classifier rules
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,

    /// Speed classifier parameters
    #[serde(default)]
    pub speed: Option<SpeedConfig>,

    /// Stock pipeline settings
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,
}

impl DrillbookConfig {
    pub fn classifier(&self) -> ClassifierConfig {
        self.classifier.clone().unwrap_or_default()
    }

    pub fn speed(&self) -> SpeedConfig {
        self.speed.unwrap_or_default()
    }

    pub fn pipeline(&self) -> PipelineConfig {
        self.pipeline.clone().unwrap_or_default()
    }
}

/// Ordered divisibility rules plus the no-match policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Rules in evaluation order; the first match wins
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,

    /// Fixed label when no rule matches (unset or empty: echo the value)
    #[serde(default)]
    pub fallback: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            fallback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub label: String,
    pub divisors: Vec<i64>,
}

fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig {
            label: "FizzBuzz".to_string(),
            divisors: vec![3, 5],
        },
        RuleConfig {
            label: "Fizz".to_string(),
            divisors: vec![3],
        },
        RuleConfig {
            label: "Buzz".to_string(),
            divisors: vec![5],
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Speed limit (default: 70)
    #[serde(default = "default_limit")]
    pub limit: f64,

    /// Speed over the limit per penalty unit (default: 5)
    #[serde(default = "default_increment")]
    pub increment: f64,

    /// Penalty units that trigger suspension (default: 12)
    #[serde(default = "default_suspension_threshold")]
    pub suspension_threshold: i64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            increment: default_increment(),
            suspension_threshold: default_suspension_threshold(),
        }
    }
}

fn default_limit() -> f64 {
    70.0
}

fn default_increment() -> f64 {
    5.0
}

fn default_suspension_threshold() -> i64 {
    DEFAULT_SUSPENSION_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Tag used to wrap values (default: "li")
    #[serde(default = "default_tag")]
    pub tag: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { tag: default_tag() }
    }
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

/// Contents written by `drillbook init`
pub const DEFAULT_CONFIG_TOML: &str = r#"# Drillbook Configuration

[classifier]
# Fixed label when no rule matches; leave empty to echo the value
fallback = ""

# Rules are evaluated top to bottom; the first match wins.
[[classifier.rules]]
label = "FizzBuzz"
divisors = [3, 5]

[[classifier.rules]]
label = "Fizz"
divisors = [3]

[[classifier.rules]]
label = "Buzz"
divisors = [5]

[speed]
limit = 70.0
increment = 5.0
suspension_threshold = 12

[pipeline]
tag = "li"
"#;
