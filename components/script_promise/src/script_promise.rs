//! The caller-facing promise handle.

use crate::resolver::ScriptPromiseResolver;
use async_runtime::{ExecutionContext, Function, Promise};
use core_types::Value;
use tracing::debug;

/// A handle to a host promise, or an empty handle.
///
/// Empty handles come from resolvers that already began settling, resolvers
/// bound to a stopped context, and `then` calls the host could not chain.
/// An empty handle means "nothing to await".
///
/// Two handles are equal if they refer to the same host promise; all empty
/// handles are equal.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, ExecutionContext, PromiseState};
/// use core_types::Value;
/// use script_promise::ScriptPromise;
///
/// let event_loop = EventLoop::new();
/// let context = ExecutionContext::new("document", &event_loop);
///
/// let promise = ScriptPromise::cast(&context, Value::Smi(3));
/// assert!(!promise.is_empty());
/// event_loop.run_until_done().unwrap();
/// assert_eq!(promise.promise().unwrap().state(), PromiseState::Fulfilled);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptPromise {
    promise: Option<Promise>,
}

impl ScriptPromise {
    /// Returns an empty handle.
    pub fn empty() -> Self {
        Self { promise: None }
    }

    /// Wraps an existing host promise.
    pub fn from_promise(promise: Promise) -> Self {
        Self {
            promise: Some(promise),
        }
    }

    /// Returns true if there is no underlying promise.
    pub fn is_empty(&self) -> bool {
        self.promise.is_none()
    }

    /// Returns the underlying host promise.
    pub fn promise(&self) -> Option<&Promise> {
        self.promise.as_ref()
    }

    /// Returns the promise as a script value.
    pub fn to_value(&self) -> Option<Value> {
        self.promise.as_ref().map(Promise::to_value)
    }

    /// Returns a promise for `value`.
    ///
    /// A value that already is a promise is wrapped as is. Anything else is
    /// resolved through a fresh resolver, so it is observed on a later task
    /// like any other settlement.
    pub fn cast(context: &ExecutionContext, value: Value) -> Self {
        if let Some(promise) = Promise::from_value(&value) {
            return Self::from_promise(promise);
        }
        let resolver = ScriptPromiseResolver::new(context);
        let promise = resolver.promise();
        resolver.resolve(value);
        promise
    }

    /// Returns a promise rejected with `reason` on a later task.
    pub fn reject(context: &ExecutionContext, reason: Value) -> Self {
        let resolver = ScriptPromiseResolver::new(context);
        let promise = resolver.promise();
        resolver.reject(reason);
        promise
    }

    /// Chains reactions onto this promise.
    ///
    /// Returns an empty handle if this handle is empty or the host could not
    /// create the continuation.
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Self {
        let Some(promise) = &self.promise else {
            return Self::empty();
        };
        match promise.then(on_fulfilled, on_rejected) {
            Ok(derived) => Self::from_promise(derived),
            Err(error) => {
                debug!(%error, "promise continuation could not be created");
                Self::empty()
            }
        }
    }
}

impl PartialEq for ScriptPromise {
    fn eq(&self, other: &Self) -> bool {
        match (&self.promise, &other.promise) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl From<Promise> for ScriptPromise {
    fn from(promise: Promise) -> Self {
        Self::from_promise(promise)
    }
}
