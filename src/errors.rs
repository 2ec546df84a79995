//! Unified error type for drillbook operations.
//!
//! Every library operation returns `Result<T, DrillError>`. The binary converts
//! into `anyhow::Error` at the edge.
//!
//! # Example
//!
//! ```rust
//! use drillbook::errors::DrillError;
//!
//! let err = DrillError::invalid_input("number", "text \"x\"");
//! assert_eq!(err.category(), "Input");
//! assert!(!err.is_retryable());
//!
//! let anyhow_err: anyhow::Error = err.into_anyhow();
//! let back: DrillError = anyhow_err.into();
//! assert!(back.message().contains("number"));
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type shared by the classifier, counter, pipeline and config layers.
///
/// # Categories
///
/// - `InvalidInputKind`: a value of the wrong kind reached a numeric operation
/// - `InvalidArgument`: a numeric argument violates its constraint
/// - `CallbackFailure`: a caller-supplied pipeline callback failed
/// - `ConfigError`: configuration could not be loaded or is inconsistent
/// - `IoError`: reading or writing files
/// - `Other`: catch-all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillError {
    /// A non-numeric value was passed where a number is required.
    InvalidInputKind { expected: String, found: String },
    /// A numeric argument is outside its allowed domain.
    InvalidArgument { message: String },
    /// A predicate, transform or comparator failed inside a pipeline stage.
    CallbackFailure {
        stage: String,
        index: usize,
        message: String,
    },
    /// Configuration file errors
    ConfigError {
        message: String,
        path: Option<PathBuf>,
    },
    /// File system I/O errors
    IoError {
        message: String,
        path: Option<PathBuf>,
    },
    /// Catch-all for other errors
    Other(String),
}

impl DrillError {
    /// Create an input-kind error.
    pub fn invalid_input(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidInputKind {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an argument-constraint error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a callback failure for the element at `index` of `stage`'s input.
    pub fn callback(stage: impl Into<String>, index: usize, message: impl fmt::Display) -> Self {
        Self::CallbackFailure {
            stage: stage.into(),
            index,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path context.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an I/O error with a message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
            path: None,
        }
    }

    /// Create an I/O error with a message and path context.
    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::IoError {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an error from any message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Get the error message without context details.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInputKind { expected, found } => {
                format!("expected {}, found {}", expected, found)
            }
            Self::InvalidArgument { message } => message.clone(),
            Self::CallbackFailure { message, .. } => message.clone(),
            Self::ConfigError { message, .. } => message.clone(),
            Self::IoError { message, .. } => message.clone(),
            Self::Other(message) => message.clone(),
        }
    }

    /// Get the associated path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::ConfigError { path, .. } => path.as_ref(),
            Self::IoError { path, .. } => path.as_ref(),
            _ => None,
        }
    }

    /// Index of the offending element for callback failures.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::CallbackFailure { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInputKind { .. } => "Input",
            Self::InvalidArgument { .. } => "Argument",
            Self::CallbackFailure { .. } => "Callback",
            Self::ConfigError { .. } => "Config",
            Self::IoError { .. } => "I/O",
            Self::Other(_) => "Error",
        }
    }

    /// Check if this error is potentially transient.
    ///
    /// Computational errors are deterministic: the same input fails the same
    /// way, so only I/O conditions that look transient qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::IoError { message, .. } => {
                let msg_lower = message.to_lowercase();
                msg_lower.contains("resource busy")
                    || msg_lower.contains("would block")
                    || msg_lower.contains("interrupted")
                    || msg_lower.contains("temporarily unavailable")
            }
            Self::InvalidInputKind { .. }
            | Self::InvalidArgument { .. }
            | Self::CallbackFailure { .. }
            | Self::ConfigError { .. }
            | Self::Other(_) => false,
        }
    }
}

impl fmt::Display for DrillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInputKind { expected, found } => {
                write!(f, "Invalid input kind: expected {}, found {}", expected, found)
            }
            Self::InvalidArgument { message } => write!(f, "Invalid argument: {}", message),
            Self::CallbackFailure {
                stage,
                index,
                message,
            } => write!(
                f,
                "Callback failed in stage '{}' at index {}: {}",
                stage, index, message
            ),
            Self::ConfigError { message, path } => {
                write!(f, "Config error: {}", message)?;
                if let Some(p) = path {
                    write!(f, " (file: {})", p.display())?;
                }
                Ok(())
            }
            Self::IoError { message, path } => {
                write!(f, "I/O error: {}", message)?;
                if let Some(p) = path {
                    write!(f, " (path: {})", p.display())?;
                }
                Ok(())
            }
            Self::Other(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for DrillError {}

// Recover a typed error when one was wrapped in anyhow, otherwise keep the text.
impl From<anyhow::Error> for DrillError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DrillError>() {
            Ok(typed) => typed,
            Err(err) => Self::Other(err.to_string()),
        }
    }
}

// anyhow's blanket From<E: StdError> already covers DrillError -> anyhow::Error.
impl DrillError {
    /// Convert this error to an anyhow::Error.
    pub fn into_anyhow(self) -> anyhow::Error {
        anyhow::Error::from(self)
    }
}

impl From<io::Error> for DrillError {
    fn from(err: io::Error) -> Self {
        Self::io(err.to_string())
    }
}

// Needed for stages built from infallible closures.
impl From<std::convert::Infallible> for DrillError {
    fn from(infallible: std::convert::Infallible) -> Self {
        match infallible {}
    }
}

/// Format a list of errors for display.
///
/// ```rust
/// use drillbook::errors::{DrillError, format_error_list};
///
/// let errors = vec![
///     DrillError::config("divisor must be non-zero"),
///     DrillError::config("rule 'Buzz' is shadowed"),
/// ];
/// let formatted = format_error_list(&errors);
/// assert!(formatted.contains("1. Config error"));
/// assert!(formatted.contains("2. Config error"));
/// ```
pub fn format_error_list(errors: &[DrillError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = DrillError::invalid_input("number", "text \"x\"");
        assert_eq!(
            err.to_string(),
            "Invalid input kind: expected number, found text \"x\""
        );
    }

    #[test]
    fn test_callback_failure_carries_index() {
        let err = DrillError::callback("filter", 3, "boom");
        assert_eq!(err.index(), Some(3));
        assert_eq!(err.category(), "Callback");
        assert!(err.to_string().contains("stage 'filter' at index 3"));
    }

    #[test]
    fn test_computational_errors_not_retryable() {
        assert!(!DrillError::invalid_input("number", "bool").is_retryable());
        assert!(!DrillError::invalid_argument("limit must be positive").is_retryable());
        assert!(!DrillError::callback("map", 0, "x").is_retryable());
    }

    #[test]
    fn test_io_resource_busy_retryable() {
        assert!(DrillError::io("Resource busy").is_retryable());
        assert!(!DrillError::io("No such file").is_retryable());
    }

    #[test]
    fn test_path_context() {
        let err = DrillError::config_with_path("bad toml", "/tmp/.drillbook.toml");
        assert_eq!(
            err.path().map(|p| p.display().to_string()),
            Some("/tmp/.drillbook.toml".to_string())
        );
        assert!(err.to_string().contains("(file: /tmp/.drillbook.toml)"));
    }

    #[test]
    fn test_anyhow_roundtrip_preserves_variant() {
        let original = DrillError::callback("sort", 2, "bad compare");
        let back: DrillError = original.clone().into_anyhow().into();
        assert_eq!(back, original);
    }

    #[test]
    fn test_from_plain_anyhow() {
        let err: DrillError = anyhow::anyhow!("plain failure").into();
        assert_eq!(err, DrillError::Other("plain failure".to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: DrillError = io_err.into();
        assert_eq!(err.category(), "I/O");
    }
}
