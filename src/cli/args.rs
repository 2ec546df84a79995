use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::formatting::ColorMode;
use crate::pipeline::RecordField;

#[derive(Parser, Debug)]
#[command(name = "drillbook")]
#[command(about = "Classification, counting and pipeline drills", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal", global = true)]
    pub format: OutputFormat,

    /// Configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    /// When to use colors (overrides NO_COLOR / CLICOLOR)
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify values with the configured divisibility rules
    Classify {
        /// Values to classify
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Classify a speed against the limit
    Speed {
        /// Measured speed
        #[arg(allow_negative_numbers = true)]
        value: String,

        /// Speed limit (defaults to the configured limit)
        #[arg(long)]
        limit: Option<f64>,

        /// Speed units per penalty point (defaults to the configured increment)
        #[arg(long)]
        increment: Option<f64>,
    },

    /// Count occurrences of a value
    Count {
        /// Value to count
        #[arg(long, allow_negative_numbers = true, required_unless_present = "tally")]
        target: Option<String>,

        /// Print the frequency of every distinct value instead
        #[arg(long)]
        tally: bool,

        /// Values to search
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Keep non-negative integers and wrap each in a tag
    Tag {
        /// Integers to filter
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,

        /// Tag name (defaults to the configured tag)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Sort a JSON array of records by one field
    SortRecords {
        /// JSON file to read, or `-` for stdin
        input: PathBuf,

        /// Field to sort by
        #[arg(long, value_enum, default_value = "id")]
        by: SortKey,

        /// Sort in descending order
        #[arg(long)]
        descending: bool,
    },

    /// Initialize a .drillbook.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Id,
    Name,
}

impl From<SortKey> for RecordField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Id => RecordField::Id,
            SortKey::Name => RecordField::Name,
        }
    }
}
