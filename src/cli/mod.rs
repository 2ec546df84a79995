//! Command-line interface: argument definitions and process setup.

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, OutputFormat, SortKey};
pub use setup::{formatting_config, init_logging, level_for_verbosity};
