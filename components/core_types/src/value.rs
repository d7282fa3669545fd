//! Opaque script value representation.
//!
//! This module provides the `Value` enum carried through resolvers, promises
//! and reaction callbacks. The bridge never inspects values beyond the checks
//! needed to recognise promise-like native objects.

use crate::JsError;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Represents any script value handed across the promise bridge.
///
/// Primitive values are stored inline. Host objects (promises included) are
/// carried as shared native objects and compared by identity.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let text = Value::from("hello");
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(text.type_of(), "string");
/// ```
#[derive(Clone)]
pub enum Value {
    /// Script undefined value
    Undefined,
    /// Script null value
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(std::string::String),
    /// Error object produced from a host-side `JsError`
    Error(Box<JsError>),
    /// Native object owned by the host (promises, wrappers, ...)
    NativeObject(Rc<RefCell<dyn Any>>),
    /// Native function reference by name
    NativeFunction(std::string::String),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(&e.kind).field(&e.message).finish(),
            Value::NativeObject(_) => write!(f, "NativeObject(...)"),
            Value::NativeFunction(name) => f.debug_tuple("NativeFunction").field(name).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a.kind == b.kind && a.message == b.message,
            (Value::NativeObject(a), Value::NativeObject(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Wraps a host object as a native object value.
    pub fn native<T: Any>(object: T) -> Self {
        Value::NativeObject(Rc::new(RefCell::new(object)) as Rc<RefCell<dyn Any>>)
    }

    /// Returns a clone of the native object payload if it has type `T`.
    pub fn downcast_native<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Value::NativeObject(object) => object.borrow().downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Returns whether this value is truthy in script semantics.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Null.is_truthy());
    /// assert!(!Value::Smi(0).is_truthy());
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(Value::Smi(42).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Error(_) => true,
            Value::NativeObject(_) => true,
            Value::NativeFunction(_) => true,
        }
    }

    /// Returns the `typeof` result for this value.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert_eq!(Value::Undefined.type_of(), "undefined");
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::Smi(42).type_of(), "number");
    /// ```
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Error(_) | Value::NativeObject(_) => "object",
            Value::NativeFunction(_) => "function",
        }
    }
}

impl From<JsError> for Value {
    fn from(error: JsError) -> Self {
        Value::Error(Box::new(error))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<std::string::String> for Value {
    fn from(s: std::string::String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

/// String conversion following `String(value)`.
///
/// ```
/// use core_types::Value;
///
/// assert_eq!(Value::Undefined.to_string(), "undefined");
/// assert_eq!(Value::Boolean(true).to_string(), "true");
/// assert_eq!(Value::Double(2.0).to_string(), "2");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
            Value::NativeObject(_) => write!(f, "[object Object]"),
            Value::NativeFunction(name) => write!(f, "function {}() {{ [native code] }}", name),
        }
    }
}
