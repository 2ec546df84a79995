//! Pipeline builder for composing stages.
//!
//! This module provides a type-safe fluent API for building pipelines.

use super::stage::{FilterStage, MapStage, SortStage, Stage};
use crate::errors::DrillError;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::Display;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

type Runner<I, T> =
    Box<dyn Fn(Vec<I>, &mut Vec<StageTiming>) -> Result<Vec<T>, DrillError> + Send + Sync>;

/// Builder for constructing pipelines.
///
/// `I` is the element type the pipeline accepts, `T` the element type the
/// stages added so far produce.
///
/// # Example
///
/// ```rust
/// use drillbook::pipeline::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::<i64>::new()
///     .filter("non-negative", |n| *n >= 0)
///     .map("wrap", |n| format!("<li>{}</li>", n))
///     .build();
///
/// let out = pipeline.execute(vec![-1, 3, 0]).unwrap();
/// assert_eq!(out, vec!["<li>3</li>", "<li>0</li>"]);
/// ```
pub struct PipelineBuilder<I, T = I> {
    run: Runner<I, T>,
    stage_names: Vec<String>,
    _phantom: PhantomData<fn(I) -> T>,
}

impl<I: 'static> PipelineBuilder<I, I> {
    /// Create a new empty pipeline builder.
    pub fn new() -> Self {
        Self {
            run: Box::new(|items: Vec<I>, _: &mut Vec<StageTiming>| Ok(items)),
            stage_names: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl<I: 'static> Default for PipelineBuilder<I, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: 'static, T: 'static> PipelineBuilder<I, T> {
    /// Add a stage to the pipeline.
    ///
    /// The stage's input type must match the current pipeline output type.
    pub fn stage<S>(self, stage: S) -> PipelineBuilder<I, S::Output>
    where
        S: Stage<Input = T> + Send + Sync + 'static,
        S::Output: 'static,
    {
        let previous = self.run;
        let mut stage_names = self.stage_names;
        stage_names.push(stage.name().to_string());

        let run: Runner<I, S::Output> =
            Box::new(move |items: Vec<I>, timings: &mut Vec<StageTiming>| {
                let items = previous(items, &mut *timings)?;
                log::debug!("entering stage '{}' with {} elements", stage.name(), items.len());
                let start = Instant::now();
                let output = stage.execute(items)?;
                log::trace!("stage '{}' produced {} elements", stage.name(), output.len());
                timings.push(StageTiming {
                    name: stage.name().to_string(),
                    duration: start.elapsed(),
                });
                Ok(output)
            });

        PipelineBuilder {
            run,
            stage_names,
            _phantom: PhantomData,
        }
    }

    /// Keep elements satisfying `predicate`.
    pub fn filter<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_filter(name, move |item: &T| Ok::<_, Infallible>(predicate(item)))
    }

    /// Keep elements satisfying a fallible `predicate`.
    pub fn try_filter<F, E>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        E: Display + 'static,
    {
        self.stage(FilterStage::new(name, predicate))
    }

    /// Transform every element.
    pub fn map<U, F>(self, name: impl Into<String>, transform: F) -> PipelineBuilder<I, U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.try_map(name, move |item: T| Ok::<_, Infallible>(transform(item)))
    }

    /// Transform every element with a fallible `transform`.
    pub fn try_map<U, F, E>(self, name: impl Into<String>, transform: F) -> PipelineBuilder<I, U>
    where
        U: 'static,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
        E: Display + 'static,
    {
        self.stage(MapStage::new(name, transform))
    }

    /// Stable sort by a three-way comparator.
    pub fn sort_by<F>(self, name: impl Into<String>, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.try_sort_by(name, move |a: &T, b: &T| Ok::<_, Infallible>(comparator(a, b)))
    }

    /// Stable sort by a fallible three-way comparator.
    pub fn try_sort_by<F, E>(self, name: impl Into<String>, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Result<Ordering, E> + Send + Sync + 'static,
        E: Display + 'static,
    {
        self.stage(SortStage::new(name, comparator))
    }

    /// Add stages conditionally.
    ///
    /// ```rust
    /// use drillbook::pipeline::PipelineBuilder;
    ///
    /// let descending = true;
    /// let pipeline = PipelineBuilder::<i32>::new()
    ///     .when(descending, |p| p.sort_by("descending", |a, b| b.cmp(a)))
    ///     .build();
    /// assert_eq!(pipeline.execute(vec![1, 3, 2]).unwrap(), vec![3, 2, 1]);
    /// ```
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Build the final pipeline ready for execution.
    pub fn build(self) -> BuiltPipeline<I, T> {
        BuiltPipeline {
            run: self.run,
            stage_names: self.stage_names,
            _phantom: PhantomData,
        }
    }
}

/// A built pipeline ready for execution.
///
/// The pipeline can be executed any number of times with different inputs and
/// shared between threads.
pub struct BuiltPipeline<I, T> {
    run: Runner<I, T>,
    stage_names: Vec<String>,
    _phantom: PhantomData<fn(I) -> T>,
}

impl<I, T> BuiltPipeline<I, T> {
    /// Run every stage in order. The first failing stage aborts the run.
    pub fn execute(&self, items: Vec<I>) -> Result<Vec<T>, DrillError> {
        let mut timings = Vec::with_capacity(self.stage_names.len());
        (self.run)(items, &mut timings)
    }

    /// Execute the pipeline and collect timing information for each stage.
    pub fn execute_with_timing(
        &self,
        items: Vec<I>,
    ) -> Result<(Vec<T>, Vec<StageTiming>), DrillError> {
        let mut timings = Vec::with_capacity(self.stage_names.len());
        let output = (self.run)(items, &mut timings)?;
        Ok((output, timings))
    }

    /// Get the number of stages in this pipeline.
    pub fn stage_count(&self) -> usize {
        self.stage_names.len()
    }

    pub fn stage_names(&self) -> &[String] {
        &self.stage_names
    }
}

/// Timing information for a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    /// Name of the stage
    pub name: String,

    /// Time taken to execute the stage
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}ms", self.name, self.duration.as_secs_f64() * 1000.0)
    }
}
