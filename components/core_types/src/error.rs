//! Script error types.
//!
//! Host-side failures (a reaction handler throwing, a chain that can no longer
//! be extended, a pump that never drains) are reported as `JsError`. Errors are
//! converted into `Value::Error` when they become a rejection reason.

use crate::{SourcePosition, StackFrame};
use std::fmt;
use thiserror::Error;

/// The kind of script error.
///
/// These correspond to the built-in error constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type error (e.g., resolving a promise with itself)
    TypeError,
    /// Value out of allowed range (e.g., promise chain too deep)
    RangeError,
    /// Operation aborted because its context went away
    AbortError,
    /// Internal engine error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::AbortError => "AbortError",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// A script error with message and stack trace.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError::new(ErrorKind::TypeError, "undefined is not a function");
///
/// assert_eq!(error.message, "undefined is not a function");
/// assert_eq!(error.to_string(), "TypeError: undefined is not a function");
/// ```
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Stack trace (call stack at the time of the error)
    pub stack: Vec<StackFrame>,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
}

impl JsError {
    /// Creates an error without stack or position information.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: Vec::new(),
            source_position: None,
        }
    }

    /// Shorthand for a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Shorthand for a `RangeError`.
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }

    /// Shorthand for an `InternalError`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Appends a frame to the stack trace.
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.stack.push(frame);
        self
    }
}
