//! Adapting native success/error completions onto a resolver.
//!
//! Native asynchronous APIs report completion through a pair of callbacks, or
//! a `Result`. [`CallbackPromiseAdapter`] turns either shape into exactly one
//! `resolve` or `reject` on the wrapped resolver.

use crate::resolver::ScriptPromiseResolver;
use core_types::{JsError, Value};
use std::marker::PhantomData;

/// Conversion of a native completion payload into a script value.
pub trait IntoScriptValue {
    /// Converts `self` into the value handed to the resolver.
    fn into_script_value(self) -> Value;
}

impl IntoScriptValue for Value {
    fn into_script_value(self) -> Value {
        self
    }
}

impl IntoScriptValue for () {
    fn into_script_value(self) -> Value {
        Value::Undefined
    }
}

impl IntoScriptValue for bool {
    fn into_script_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl IntoScriptValue for i32 {
    fn into_script_value(self) -> Value {
        Value::Smi(self)
    }
}

impl IntoScriptValue for f64 {
    fn into_script_value(self) -> Value {
        Value::Double(self)
    }
}

impl IntoScriptValue for String {
    fn into_script_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoScriptValue for &str {
    fn into_script_value(self) -> Value {
        Value::from(self)
    }
}

impl IntoScriptValue for JsError {
    fn into_script_value(self) -> Value {
        Value::from(self)
    }
}

/// Wraps a resolver for a native operation completing with `S` or failing with `E`.
///
/// The adapter is consumed by the completion, so a native API can complete it
/// at most once. Dropping it unused leaves the resolver untouched.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, ExecutionContext, PromiseState};
/// use core_types::{JsError, Value};
/// use script_promise::{CallbackPromiseAdapter, ScriptPromiseResolver};
///
/// let event_loop = EventLoop::new();
/// let context = ExecutionContext::new("document", &event_loop);
/// let resolver = ScriptPromiseResolver::new(&context);
/// let promise = resolver.promise();
///
/// let callback = CallbackPromiseAdapter::<i32, JsError>::new(resolver).into_callback();
/// callback(Ok(7));
///
/// event_loop.run_until_done().unwrap();
/// assert_eq!(promise.promise().unwrap().result(), Some(Value::Smi(7)));
/// ```
pub struct CallbackPromiseAdapter<S, E> {
    resolver: ScriptPromiseResolver,
    _completion: PhantomData<fn(S, E)>,
}

impl<S, E> CallbackPromiseAdapter<S, E>
where
    S: IntoScriptValue,
    E: IntoScriptValue,
{
    /// Wraps `resolver`.
    pub fn new(resolver: ScriptPromiseResolver) -> Self {
        Self {
            resolver,
            _completion: PhantomData,
        }
    }

    /// Returns the wrapped resolver.
    pub fn resolver(&self) -> &ScriptPromiseResolver {
        &self.resolver
    }

    /// Completes the operation successfully.
    pub fn on_success(self, result: S) {
        self.resolver.resolve(result.into_script_value());
    }

    /// Completes the operation with an error.
    pub fn on_error(self, error: E) {
        self.resolver.reject(error.into_script_value());
    }

    /// Completes the operation from a `Result`.
    pub fn complete(self, result: Result<S, E>) {
        match result {
            Ok(value) => self.on_success(value),
            Err(error) => self.on_error(error),
        }
    }

    /// Turns the adapter into a one-shot completion callback.
    pub fn into_callback(self) -> impl FnOnce(Result<S, E>)
    where
        S: 'static,
        E: 'static,
    {
        move |result| self.complete(result)
    }
}
