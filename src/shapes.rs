//! Shapes sharing a base capability set.
//!
//! Every shape has a color and can describe a duplicate of itself (shared
//! behaviour provided by the trait); drawing is specific to each variant.
//! Field enumeration lists declared data fields only, never behaviour.

use crate::errors::DrillError;
use crate::pipeline::FieldValue;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Circle => write!(f, "circle"),
            ShapeKind::Square => write!(f, "square"),
        }
    }
}

pub trait Shape {
    fn kind(&self) -> ShapeKind;

    fn color(&self) -> &str;

    /// Declared data fields, in declaration order.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    fn draw(&self) -> String;

    fn describe_duplicate(&self) -> String {
        format!("duplicate of {} {}", self.color(), self.kind())
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields().iter().any(|(field, _)| *field == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    radius: f64,
    color: String,
    default_location: Point,
}

impl Circle {
    pub fn new(radius: f64, color: impl Into<String>) -> Result<Self, DrillError> {
        ensure_dimension("radius", radius)?;
        Ok(Self {
            radius,
            color: color.into(),
            default_location: Point::default(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn default_location(&self) -> Point {
        self.default_location
    }

    pub fn set_default_location(&mut self, location: Point) {
        log::debug!(
            "circle default location reset to ({}, {})",
            location.x,
            location.y
        );
        self.default_location = location;
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Shape for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("radius", FieldValue::Real(self.radius)),
            ("color", FieldValue::Text(self.color.clone())),
        ]
    }

    fn draw(&self) -> String {
        format!("circle r={} ({})", self.radius, self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Square {
    size: f64,
    color: String,
}

impl Square {
    pub fn new(size: f64, color: impl Into<String>) -> Result<Self, DrillError> {
        ensure_dimension("size", size)?;
        Ok(Self {
            size,
            color: color.into(),
        })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn area(&self) -> f64 {
        self.size * self.size
    }
}

impl Shape for Square {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Square
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("size", FieldValue::Real(self.size)),
            ("color", FieldValue::Text(self.color.clone())),
        ]
    }

    fn draw(&self) -> String {
        format!("square {}x{} ({})", self.size, self.size, self.color)
    }
}

fn ensure_dimension(name: &str, value: f64) -> Result<(), DrillError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DrillError::invalid_argument(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}
