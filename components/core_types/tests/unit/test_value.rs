//! Unit tests for Value

use core_types::{ErrorKind, JsError, Value};

#[cfg(test)]
mod truthiness_tests {
    use super::*;

    #[test]
    fn test_falsy_primitives() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Smi(0).is_truthy());
        assert!(!Value::Double(0.0).is_truthy());
        assert!(!Value::Double(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
    }

    #[test]
    fn test_objects_are_truthy() {
        assert!(Value::native(0u8).is_truthy());
        assert!(Value::NativeFunction("then".to_string()).is_truthy());
        assert!(Value::from(JsError::internal("x")).is_truthy());
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(String::from("bye")), Value::String("bye".to_string()));
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(7), Value::Smi(7));
        assert_eq!(Value::from(1.5), Value::Double(1.5));
    }

    #[test]
    fn test_from_error_keeps_kind() {
        let value = Value::from(JsError::new(ErrorKind::AbortError, "stopped"));
        match value {
            Value::Error(e) => {
                assert_eq!(e.kind, ErrorKind::AbortError);
                assert_eq!(e.message, "stopped");
            }
            other => panic!("expected error value, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Smi(-3).to_string(), "-3");
        assert_eq!(Value::Double(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Double(0.25).to_string(), "0.25");
        assert_eq!(Value::native(()).to_string(), "[object Object]");
    }
}
