//! Terminal styling for command reports.
//!
//! Color is decided once, from `--plain`/`--color` or the usual environment
//! variables, and every report goes through an [`OutputFormatter`].

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    /// Always emit ANSI colors
    Always,
    /// Never emit ANSI colors
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_supports_color(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honour `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`, in that order
    /// of increasing precedence.
    pub fn from_env() -> Self {
        Self::new(color_from_env(|key| env::var(key).ok()))
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

fn color_from_env(lookup: impl Fn(&str) -> Option<String>) -> ColorMode {
    if lookup("CLICOLOR_FORCE").as_deref() == Some("1") {
        ColorMode::Always
    } else if lookup("NO_COLOR").is_some() || lookup("CLICOLOR").as_deref() == Some("0") {
        ColorMode::Never
    } else {
        ColorMode::Auto
    }
}

/// Styles for the parts of a report.
pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
}

/// ANSI styling through `colored`.
pub struct ColoredFormatter;

impl ColoredFormatter {
    /// Forces `colored` on, so output is styled even when piped.
    pub fn new() -> Self {
        colored::control::set_override(true);
        Self
    }
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(text: &str, style: fn(&str) -> ColoredString) -> String {
    style(text).to_string()
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        paint(text, |t| t.red().bold())
    }

    fn warning(&self, text: &str) -> String {
        paint(text, |t| t.yellow())
    }

    fn header(&self, text: &str) -> String {
        paint(text, |t| t.blue().bold())
    }

    fn dim(&self, text: &str) -> String {
        paint(text, |t| t.dimmed())
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Pick a formatter for the given configuration.
pub fn formatter_for(config: FormattingConfig) -> Box<dyn OutputFormatter> {
    if config.color.should_use_color() {
        Box::new(ColoredFormatter::new())
    } else {
        Box::new(PlainFormatter)
    }
}

fn stdout_supports_color() -> bool {
    env::var("TERM").map_or(true, |term| term != "dumb") && std::io::stdout().is_terminal()
}
