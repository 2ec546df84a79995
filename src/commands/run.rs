//! Report-producing handlers for the value subcommands.

use crate::classify::{DivisorClassifier, Label, SpeedClassifier, SpeedLabel, Value};
use crate::config::DrillbookConfig;
use crate::counter::{count_occurrences, count_occurrences_par, tally_sorted};
use crate::errors::DrillError;
use crate::formatting::OutputFormatter;
use crate::output::Report;
use crate::pipeline::{sort_records, tag_non_negative, Record, RecordField, SortDirection};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Inputs at least this long are counted with rayon.
const PARALLEL_COUNT_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifyEntry {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifyReport {
    pub results: Vec<ClassifyEntry>,
}

/// Classify every token; a non-numeric token is recorded against its entry
/// and does not stop the others.
pub fn classify_values(
    config: &DrillbookConfig,
    tokens: &[String],
) -> Result<ClassifyReport, DrillError> {
    let classifier = DivisorClassifier::from_config(&config.classifier())?;
    let results = tokens
        .iter()
        .map(|token| match classifier.classify(&Value::parse(token)) {
            Ok(label) => ClassifyEntry {
                input: token.clone(),
                label: Some(label),
                error: None,
            },
            Err(e) => {
                log::info!("cannot classify {:?}: {}", token, e);
                ClassifyEntry {
                    input: token.clone(),
                    label: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();
    Ok(ClassifyReport { results })
}

impl Report for ClassifyReport {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
        self.results
            .iter()
            .map(|entry| match (&entry.label, &entry.error) {
                (Some(label @ Label::Rule(_)), _) => {
                    format!("{}: {}", entry.input, formatter.success(&label.to_string()))
                }
                (Some(label), _) => {
                    format!("{}: {}", entry.input, formatter.dim(&label.to_string()))
                }
                (None, Some(error)) => format!("{}: {}", entry.input, formatter.error(error)),
                (None, None) => entry.input.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn has_failures(&self) -> bool {
        self.results.iter().any(|entry| entry.error.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedReport {
    pub input: String,
    pub limit: f64,
    pub increment: f64,
    pub label: SpeedLabel,
}

/// Classify one speed. Flags override the configured limit and increment.
pub fn run_speed(
    config: &DrillbookConfig,
    token: &str,
    limit: Option<f64>,
    increment: Option<f64>,
) -> Result<SpeedReport, DrillError> {
    let speed = config.speed();
    let classifier = SpeedClassifier::new(
        limit.unwrap_or(speed.limit),
        increment.unwrap_or(speed.increment),
    )?
    .with_suspension_threshold(speed.suspension_threshold)?;

    let label = classifier.classify(&Value::parse(token))?;
    Ok(SpeedReport {
        input: token.to_string(),
        limit: classifier.limit(),
        increment: classifier.increment(),
        label,
    })
}

impl Report for SpeedReport {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
        let label = self.label.to_string();
        let styled = match self.label {
            SpeedLabel::WithinLimit => formatter.success(&label),
            SpeedLabel::Points { .. } => formatter.warning(&label),
            SpeedLabel::Suspended => formatter.error(&label),
        };
        format!(
            "{} {}\n{}",
            formatter.header("Speed"),
            self.input,
            styled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountReport {
    pub target: Value,
    pub total: usize,
    pub count: usize,
}

/// Count values equal to `target`. Equality is kind-sensitive: `1` and `1.0`
/// are different values.
pub fn count_values(target: &str, tokens: &[String]) -> CountReport {
    let target = Value::parse(target);
    let values: Vec<Value> = tokens.iter().map(|t| Value::parse(t)).collect();
    let count = if values.len() >= PARALLEL_COUNT_THRESHOLD {
        count_occurrences_par(&values, &target)
    } else {
        count_occurrences(&values, &target)
    };
    log::debug!("{} of {} values equal {}", count, values.len(), target);
    CountReport {
        target,
        total: values.len(),
        count,
    }
}

impl Report for CountReport {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
        format!(
            "{}: {} {}",
            self.target,
            formatter.success(&self.count.to_string()),
            formatter.dim(&format!("(of {})", self.total))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub kind: &'static str,
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyReport {
    pub entries: Vec<TallyEntry>,
}

/// Frequencies of every distinct value, most frequent first.
pub fn tally_values(tokens: &[String]) -> TallyReport {
    let keys: Vec<(&'static str, String)> = tokens
        .iter()
        .map(|t| {
            let value = Value::parse(t);
            (value.kind_name(), value.to_string())
        })
        .collect();
    let entries = tally_sorted(&keys)
        .into_iter()
        .map(|((kind, value), count)| TallyEntry { kind, value, count })
        .collect();
    TallyReport { entries }
}

impl Report for TallyReport {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
        if self.entries.is_empty() {
            return formatter.dim("no values");
        }
        self.entries
            .iter()
            .map(|entry| format!("{:>6}  {}", entry.count, entry.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReport {
    pub tag: String,
    pub items: Vec<String>,
}

pub fn run_tag(
    config: &DrillbookConfig,
    values: Vec<i64>,
    tag: Option<String>,
) -> Result<TagReport, DrillError> {
    let tag = tag.unwrap_or_else(|| config.pipeline().tag);
    let items = tag_non_negative(values, &tag)?;
    Ok(TagReport { tag, items })
}

impl Report for TagReport {
    fn render_terminal(&self, _formatter: &dyn OutputFormatter) -> String {
        self.items.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordsReport {
    pub by: RecordField,
    pub direction: SortDirection,
    pub records: Vec<Record>,
}

/// Read a JSON array of records from `input` (`-` for stdin) and sort it.
pub fn run_sort_records(
    input: &Path,
    field: RecordField,
    direction: SortDirection,
) -> Result<RecordsReport, DrillError> {
    let contents = read_input(input)?;
    let records = parse_records(&contents).map_err(|e| {
        DrillError::invalid_argument(format!("{}: {}", input.display(), e.message()))
    })?;
    let records = sort_records(records, field, direction)?;
    Ok(RecordsReport {
        by: field,
        direction,
        records,
    })
}

pub fn parse_records(contents: &str) -> Result<Vec<Record>, DrillError> {
    serde_json::from_str(contents)
        .map_err(|e| DrillError::invalid_argument(format!("Invalid record list: {}", e)))
}

fn read_input(input: &Path) -> Result<String, DrillError> {
    if input.as_os_str() == "-" {
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        return Ok(contents);
    }
    std::fs::read_to_string(input)
        .map_err(|e| DrillError::io_with_path(e.to_string(), input.to_path_buf()))
}

impl Report for RecordsReport {
    fn render_terminal(&self, formatter: &dyn OutputFormatter) -> String {
        let mut lines = vec![formatter.header(&format!("{:>6}  {}", "id", "name"))];
        lines.extend(
            self.records
                .iter()
                .map(|record| format!("{:>6}  {}", record.id, record.name)),
        );
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::PlainFormatter;
    use pretty_assertions::assert_eq;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_reports_each_value() {
        let inputs = tokens(&["15", "9", "7", "abc"]);
        let report = classify_values(&DrillbookConfig::default(), &inputs).unwrap();
        let rendered = report.render_terminal(&PlainFormatter);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(&lines[..3], &["15: FizzBuzz", "9: Fizz", "7: 7"]);
        assert!(lines[3].starts_with("abc: Invalid input kind"));
        assert!(report.has_failures());
        assert_eq!(report.results[0].label, Some(Label::rule("FizzBuzz")));
        assert!(report.results[3].error.is_some());
    }

    #[test]
    fn test_classify_all_numeric_has_no_failures() {
        let report = classify_values(&DrillbookConfig::default(), &tokens(&["3", "5"])).unwrap();
        assert!(!report.has_failures());
    }

    #[test]
    fn test_speed_overrides() {
        let config = DrillbookConfig::default();
        assert_eq!(
            run_speed(&config, "80", None, None).unwrap().label,
            SpeedLabel::Points { units: 2 }
        );
        assert_eq!(
            run_speed(&config, "80", Some(90.0), None).unwrap().label,
            SpeedLabel::WithinLimit
        );
        assert!(run_speed(&config, "fast", None, None).is_err());
        assert!(run_speed(&config, "80", None, Some(0.0)).is_err());
    }

    #[test]
    fn test_count_is_kind_sensitive() {
        let report = count_values("1", &tokens(&["1", "2", "1", "1.5", "1"]));
        assert_eq!(report.count, 3);
        assert_eq!(report.total, 5);
        assert_eq!(report.render_terminal(&PlainFormatter), "1: 3 (of 5)");
    }

    #[test]
    fn test_tally_orders_by_count() {
        let report = tally_values(&tokens(&["b", "a", "b", "1"]));
        let values: Vec<(&str, usize)> = report
            .entries
            .iter()
            .map(|e| (e.value.as_str(), e.count))
            .collect();
        assert_eq!(values, vec![("b", 2), ("1", 1), ("a", 1)]);
    }

    #[test]
    fn test_tag_uses_configured_tag() {
        let report = run_tag(&DrillbookConfig::default(), vec![-1, 2, 0], None).unwrap();
        assert_eq!(report.items, vec!["<li>2</li>", "<li>0</li>"]);
        let report = run_tag(&DrillbookConfig::default(), vec![5], Some("td".into())).unwrap();
        assert_eq!(report.render_terminal(&PlainFormatter), "<td>5</td>");
    }

    #[test]
    fn test_parse_records_rejects_bad_json() {
        assert!(parse_records("[{\"id\": 1}]").is_err());
        assert_eq!(
            parse_records("[{\"id\": 1, \"name\": \"Ada\"}]").unwrap(),
            vec![Record::new(1, "Ada")]
        );
    }
}
