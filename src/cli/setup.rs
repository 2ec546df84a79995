//! Process setup for the binary: logging and terminal formatting.

use crate::formatting::{ColorMode, FormattingConfig};
use log::LevelFilter;

/// Map the `-v` count onto a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialise `env_logger` once at startup.
///
/// `RUST_LOG`, when set, takes precedence over the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    if std::env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for_verbosity(verbosity));
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);

    if let Err(e) = builder.try_init() {
        eprintln!("Note: logger already initialised: {}", e);
    }
}

/// Formatting configuration: `--plain` wins, then `--color`, then the color
/// environment variables.
pub fn formatting_config(plain: bool, color: Option<ColorMode>) -> FormattingConfig {
    match (plain, color) {
        (true, _) => FormattingConfig::plain(),
        (false, Some(mode)) => FormattingConfig::new(mode),
        (false, None) => FormattingConfig::from_env(),
    }
}
