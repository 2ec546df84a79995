//! Pipeline stage abstractions.
//!
//! A stage consumes a sequence and produces a sequence. Caller-supplied
//! callbacks may fail; a failure stops the stage immediately and is reported
//! as `DrillError::CallbackFailure` carrying the index of the offending
//! element within the stage's input.

use crate::errors::DrillError;
use std::cmp::Ordering;
use std::fmt::Display;
use std::marker::PhantomData;

/// A pipeline stage that transforms a sequence.
///
/// The type system ensures stages can only be chained when the element types
/// line up:
/// ```rust,ignore
/// builder
///     .filter("non-negative", |n: &i64| *n >= 0)   // i64 -> i64
///     .map("wrap", |n: i64| format!("<li>{n}</li>")) // i64 -> String
///     .sort_by("by length", |a: &String, b: &String| a.len().cmp(&b.len()));
/// ```
pub trait Stage {
    type Input;
    type Output;

    /// Execute this stage over the whole input sequence.
    fn execute(&self, items: Vec<Self::Input>) -> Result<Vec<Self::Output>, DrillError>;

    /// Stage name used in logs and error messages.
    fn name(&self) -> &str;
}

/// Keeps the elements for which the predicate holds, preserving order.
pub struct FilterStage<F, T, E> {
    name: String,
    predicate: F,
    _phantom: PhantomData<fn(&T) -> E>,
}

impl<F, T, E> FilterStage<F, T, E>
where
    F: Fn(&T) -> Result<bool, E>,
    E: Display,
{
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E> Stage for FilterStage<F, T, E>
where
    F: Fn(&T) -> Result<bool, E>,
    E: Display,
{
    type Input = T;
    type Output = T;

    fn execute(&self, items: Vec<T>) -> Result<Vec<T>, DrillError> {
        let mut kept = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let keep = (self.predicate)(&item)
                .map_err(|e| DrillError::callback(&self.name, index, e))?;
            if keep {
                kept.push(item);
            }
        }
        Ok(kept)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Applies a transform to every element independently.
pub struct MapStage<F, T, U, E> {
    name: String,
    transform: F,
    _phantom: PhantomData<fn(T) -> (U, E)>,
}

impl<F, T, U, E> MapStage<F, T, U, E>
where
    F: Fn(T) -> Result<U, E>,
    E: Display,
{
    pub fn new(name: impl Into<String>, transform: F) -> Self {
        Self {
            name: name.into(),
            transform,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, U, E> Stage for MapStage<F, T, U, E>
where
    F: Fn(T) -> Result<U, E>,
    E: Display,
{
    type Input = T;
    type Output = U;

    fn execute(&self, items: Vec<T>) -> Result<Vec<U>, DrillError> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                (self.transform)(item).map_err(|e| DrillError::callback(&self.name, index, e))
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Stable sort with a three-way comparator.
///
/// Elements comparing `Equal` keep their input order. If the comparator
/// fails, the remaining comparisons are short-circuited and the failure is
/// attributed to one element of the failing pair: the one that also fails when
/// compared with itself, or the earlier of the two when that does not single
/// one out. The reported index never depends on the order in which the sort
/// happens to visit pairs.
pub struct SortStage<F, T, E> {
    name: String,
    comparator: F,
    _phantom: PhantomData<fn(&T) -> E>,
}

impl<F, T, E> SortStage<F, T, E>
where
    F: Fn(&T, &T) -> Result<Ordering, E>,
    E: Display,
{
    pub fn new(name: impl Into<String>, comparator: F) -> Self {
        Self {
            name: name.into(),
            comparator,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E> SortStage<F, T, E>
where
    F: Fn(&T, &T) -> Result<Ordering, E>,
    E: Display,
{
    /// `(culprit, other)` input indices for a failing comparison.
    fn culprit(&self, left: (usize, &T), right: (usize, &T)) -> (usize, usize) {
        let left_fails = (self.comparator)(left.1, left.1).is_err();
        let right_fails = (self.comparator)(right.1, right.1).is_err();
        match (left_fails, right_fails) {
            (true, false) => (left.0, right.0),
            (false, true) => (right.0, left.0),
            _ => (left.0.min(right.0), left.0.max(right.0)),
        }
    }
}

impl<F, T, E> Stage for SortStage<F, T, E>
where
    F: Fn(&T, &T) -> Result<Ordering, E>,
    E: Display,
{
    type Input = T;
    type Output = T;

    fn execute(&self, items: Vec<T>) -> Result<Vec<T>, DrillError> {
        let mut indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
        let mut failure: Option<DrillError> = None;

        // slice::sort_by is stable
        indexed.sort_by(|(left_index, left), (right_index, right)| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            match (self.comparator)(left, right) {
                Ok(ordering) => ordering,
                Err(e) => {
                    let (culprit, other) =
                        self.culprit((*left_index, left), (*right_index, right));
                    failure = Some(DrillError::callback(
                        &self.name,
                        culprit,
                        format!("{} (compared with index {})", e, other),
                    ));
                    Ordering::Equal
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(indexed.into_iter().map(|(_, item)| item).collect()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
