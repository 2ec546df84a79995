//! Subcommand handlers.
//!
//! Handlers build their classifiers from the resolved configuration, run the
//! library operation and hand back a [`Report`](crate::output::Report). Only
//! [`dispatch`] touches stdout.

pub mod init;
pub mod run;

use crate::cli::{formatting_config, Cli, Commands, OutputFormat};
use crate::config::{load_config, load_config_from_path, DrillbookConfig};
use crate::errors::DrillError;
use crate::formatting::{formatter_for, OutputFormatter};
use crate::output::{write_report, Report};
use crate::pipeline::SortDirection;
use std::io::Write;
use std::path::Path;

pub use run::{
    classify_values, count_values, run_sort_records, run_speed, run_tag, tally_values,
    ClassifyEntry, ClassifyReport, CountReport, RecordsReport, SpeedReport, TagReport,
    TallyEntry, TallyReport,
};

/// Explicit paths must load; discovery falls back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<DrillbookConfig, DrillError> {
    match explicit {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(load_config()),
    }
}

/// Run the parsed command line. Returns `false` when the command reported
/// per-value failures.
pub fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let resolve = || resolve_config(cli.config.as_deref());

    let report: Box<dyn ReportObject> = match cli.command {
        Commands::Init { force } => {
            init::init_config(force)?;
            return Ok(true);
        }
        Commands::Classify { values } => Box::new(classify_values(&resolve()?, &values)?),
        Commands::Speed {
            value,
            limit,
            increment,
        } => Box::new(run_speed(&resolve()?, &value, limit, increment)?),
        Commands::Count {
            target: Some(target),
            tally: false,
            values,
        } => Box::new(count_values(&target, &values)),
        Commands::Count { values, .. } => Box::new(tally_values(&values)),
        Commands::Tag { values, tag } => Box::new(run_tag(&resolve()?, values, tag)?),
        Commands::SortRecords {
            input,
            by,
            descending,
        } => {
            let direction = if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            Box::new(run_sort_records(&input, by.into(), direction)?)
        }
    };

    let formatter = formatter_for(formatting_config(cli.plain, cli.color));
    let stdout = std::io::stdout();
    report.write_to(cli.format, formatter.as_ref(), &mut stdout.lock())?;
    Ok(!report.failed())
}

/// Object-safe view over concrete reports for dispatch.
trait ReportObject {
    fn write_to(
        &self,
        format: OutputFormat,
        formatter: &dyn OutputFormatter,
        out: &mut dyn Write,
    ) -> Result<(), DrillError>;

    fn failed(&self) -> bool;
}

impl<R: Report> ReportObject for R {
    fn write_to(
        &self,
        format: OutputFormat,
        formatter: &dyn OutputFormatter,
        out: &mut dyn Write,
    ) -> Result<(), DrillError> {
        write_report(self, format, formatter, out)
    }

    fn failed(&self) -> bool {
        self.has_failures()
    }
}
