//! Core value and error types shared by the promise bridge.
//!
//! # Overview
//!
//! - [`Value`] - Opaque script value carried by resolvers and promises
//! - [`JsError`] - Host-side script errors with stack traces
//! - [`ErrorKind`] - Types of script errors
//! - [`SourcePosition`] / [`StackFrame`] - Location information for errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, Value};
//!
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//!
//! let reason = Value::from(JsError::new(ErrorKind::AbortError, "context stopped"));
//! assert_eq!(reason.to_string(), "AbortError: context stopped");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
mod value;

pub use error::{ErrorKind, JsError};
pub use source::{SourcePosition, StackFrame};
pub use value::Value;
