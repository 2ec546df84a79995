//! Filter → map → sort pipelines over sequences.
//!
//! Stages are pure: the filter keeps relative order, the map preserves
//! length, and the sort is stable. A failing callback aborts the run with a
//! `CallbackFailure` naming the stage and the offending element's index; no
//! later stage sees any element.

pub mod builder;
pub mod records;
pub mod stage;

pub use builder::{BuiltPipeline, PipelineBuilder, StageTiming};
pub use records::{
    sort_records, tag_non_negative, validate_tag, wrap_in_tag, FieldValue, Record, RecordField,
    SortDirection, DEFAULT_TAG,
};
pub use stage::{FilterStage, MapStage, SortStage, Stage};

use crate::errors::DrillError;
use std::cmp::Ordering;
use std::fmt::Display;

/// Filter, transform, then stably sort `items`.
///
/// ```rust
/// use drillbook::pipeline::process;
/// use std::convert::Infallible;
///
/// let out = process(
///     vec![5, -1, 3],
///     |n: &i32| Ok::<_, Infallible>(*n > 0),
///     |n: i32| Ok(n * 10),
///     |a: &i32, b: &i32| Ok(a.cmp(b)),
/// )
/// .unwrap();
/// assert_eq!(out, vec![30, 50]);
/// ```
pub fn process<T, U, E, P, M, C>(
    items: Vec<T>,
    predicate: P,
    transform: M,
    comparator: C,
) -> Result<Vec<U>, DrillError>
where
    T: 'static,
    U: 'static,
    E: Display + 'static,
    P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    M: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    C: Fn(&U, &U) -> Result<Ordering, E> + Send + Sync + 'static,
{
    PipelineBuilder::<T>::new()
        .try_filter("filter", predicate)
        .try_map("map", transform)
        .try_sort_by("sort", comparator)
        .build()
        .execute(items)
}

/// [`process`] without the sort stage.
pub fn process_unsorted<T, U, E, P, M>(
    items: Vec<T>,
    predicate: P,
    transform: M,
) -> Result<Vec<U>, DrillError>
where
    T: 'static,
    U: 'static,
    E: Display + 'static,
    P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    M: Fn(T) -> Result<U, E> + Send + Sync + 'static,
{
    PipelineBuilder::<T>::new()
        .try_filter("filter", predicate)
        .try_map("map", transform)
        .build()
        .execute(items)
}
