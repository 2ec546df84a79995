//! Configuration for drillbook.
//!
//! Settings live in `.drillbook.toml`. Every section is optional; missing
//! sections and fields fall back to the built-in defaults.

mod core;
mod loader;

pub use self::core::{
    ClassifierConfig, DrillbookConfig, PipelineConfig, RuleConfig, SpeedConfig,
    DEFAULT_CONFIG_TOML,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from_path, parse_and_validate_config,
    ConfigLoadError, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};
