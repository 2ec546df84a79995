// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod counter;
pub mod errors;
pub mod formatting;
pub mod output;
pub mod pipeline;
pub mod shapes;

// Re-export commonly used types
pub use crate::classify::{
    classify, classify_speed, DefaultLabel, DivisorClassifier, DivisorRule, Label, Number,
    SpeedClassifier, SpeedLabel, Value,
};

pub use crate::counter::{count_matching, count_occurrences, count_occurrences_par, tally};

pub use crate::pipeline::{
    process, process_unsorted, sort_records, tag_non_negative, BuiltPipeline, PipelineBuilder,
    Record, RecordField, SortDirection, Stage,
};

pub use crate::config::{load_config, DrillbookConfig};

pub use crate::errors::{format_error_list, DrillError};

pub use crate::shapes::{Circle, Shape, ShapeKind, Square};
