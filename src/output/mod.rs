//! Rendering command reports as terminal text or JSON.

use crate::cli::OutputFormat;
use crate::errors::DrillError;
use crate::formatting::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// A command result that can be shown to the user.
pub trait Report: Serialize {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String;

    /// True when some part of the report describes a failure the exit code
    /// should reflect.
    fn has_failures(&self) -> bool {
        false
    }
}

pub fn render<R: Report + ?Sized>(
    report: &R,
    format: OutputFormat,
    formatter: &dyn OutputFormatter,
) -> Result<String, DrillError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| DrillError::other(format!("Failed to serialize report: {}", e))),
        OutputFormat::Terminal => Ok(report.render_terminal(formatter)),
    }
}

/// Render `report` and write it, newline terminated, to `out`.
pub fn write_report<R, W>(
    report: &R,
    format: OutputFormat,
    formatter: &dyn OutputFormatter,
    out: &mut W,
) -> Result<(), DrillError>
where
    R: Report + ?Sized,
    W: Write + ?Sized,
{
    let rendered = render(report, format, formatter)?;
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::PlainFormatter;

    #[derive(Serialize)]
    struct Greeting {
        name: String,
    }

    impl Report for Greeting {
        fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
            formatter.header(&format!("hello {}\n", self.name))
        }
    }

    #[test]
    fn test_render_json() {
        let greeting = Greeting {
            name: "ada".to_string(),
        };
        let json = render(&greeting, OutputFormat::Json, &PlainFormatter).unwrap();
        assert_eq!(json, "{\n  \"name\": \"ada\"\n}");
        assert!(!greeting.has_failures());
    }

    #[test]
    fn test_write_report_trims_trailing_newlines() {
        let greeting = Greeting {
            name: "ada".to_string(),
        };
        let mut buffer = Vec::new();
        write_report(&greeting, OutputFormat::Terminal, &PlainFormatter, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "hello ada\n");
    }
}
