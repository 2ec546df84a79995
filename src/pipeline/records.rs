//! Records and the two stock pipelines built on them.
//!
//! Comparators never look at a whole record: sorting always goes through an
//! explicit [`RecordField`] projection.

use super::builder::PipelineBuilder;
use crate::errors::DrillError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tag used by [`tag_non_negative`] when none is configured.
pub const DEFAULT_TAG: &str = "li";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
}

/// A field value yielded by declared-field enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u64),
    Real(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Real(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Record {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::Integer(self.id)),
            ("name", FieldValue::Text(self.name.clone())),
        ]
    }
}

/// Field a record comparator projects onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Id,
    Name,
}

impl RecordField {
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            RecordField::Id => a.id.cmp(&b.id),
            RecordField::Name => a.name.cmp(&b.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort of records on one projected field.
///
/// Records with equal keys keep their input order in both directions.
pub fn sort_records(
    records: Vec<Record>,
    field: RecordField,
    direction: SortDirection,
) -> Result<Vec<Record>, DrillError> {
    let stage_name = format!("sort by {:?} ({:?})", field, direction).to_lowercase();
    PipelineBuilder::<Record>::new()
        .sort_by(stage_name, move |a, b| direction.apply(field.compare(a, b)))
        .build()
        .execute(records)
}

/// Wrap a value in `<tag>value</tag>`.
pub fn wrap_in_tag(value: impl fmt::Display, tag: &str) -> String {
    format!("<{tag}>{value}</{tag}>")
}

/// Tag names are restricted to ASCII letters, digits and `-`.
pub fn validate_tag(tag: &str) -> Result<(), DrillError> {
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(DrillError::invalid_argument(format!(
            "tag must be a non-empty alphanumeric name, got {:?}",
            tag
        )));
    }
    Ok(())
}

/// Keep the non-negative values, in order, each wrapped in `tag`.
///
/// ```rust
/// use drillbook::pipeline::tag_non_negative;
///
/// let tagged = tag_non_negative(vec![-1, 3, 21, -2, 4, 6, 0, -5], "li").unwrap();
/// assert_eq!(tagged, ["<li>3</li>", "<li>21</li>", "<li>4</li>", "<li>6</li>", "<li>0</li>"]);
/// ```
pub fn tag_non_negative(values: Vec<i64>, tag: &str) -> Result<Vec<String>, DrillError> {
    validate_tag(tag)?;
    let tag = tag.to_string();
    PipelineBuilder::<i64>::new()
        .filter("non-negative", |n| *n >= 0)
        .map("wrap in tag", move |n| wrap_in_tag(n, &tag))
        .build()
        .execute(values)
}
