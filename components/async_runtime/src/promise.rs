//! Host promise primitive.
//!
//! This is the future/promise object the resolver layer settles: it supports
//! construct-empty, resolve, reject, `then` and promise detection. Reactions
//! always run as microtasks on the owning [`EventLoop`], never synchronously
//! inside `resolve`, `reject` or `then`.

use crate::event_loop::EventLoop;
use crate::task_queue::MicroTask;
use core_types::{JsError, StackFrame, Value};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been fulfilled with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

/// A reaction callback.
///
/// Called with the settled value as its single argument. Returning `Err`
/// rejects the derived promise.
pub struct Function {
    callback: Box<dyn FnMut(Vec<Value>) -> Result<Value, JsError>>,
}

impl Function {
    /// Creates a new Function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Result<Value, JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Calls the function with the given arguments.
    pub fn call(&mut self, args: Vec<Value>) -> Result<Value, JsError> {
        (self.callback)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ ... }}")
    }
}

/// A reaction to be triggered when a Promise settles.
///
/// Handlers registered via `then`, or a forwarding link created when one
/// promise adopts another (both handlers `None`).
#[derive(Debug)]
pub struct PromiseReaction {
    /// The promise settled with the outcome of this reaction
    pub capability: Promise,
    /// Handler for fulfilled state
    pub on_fulfilled: Option<Function>,
    /// Handler for rejected state
    pub on_rejected: Option<Function>,
}

struct PromiseInner {
    state: PromiseState,
    result: Option<Value>,
    reactions: Vec<PromiseReaction>,
    already_resolved: bool,
    depth: usize,
    // Script value handed out by `to_value`; weak so the promise does not own itself.
    wrapper: Option<Weak<RefCell<dyn Any>>>,
}

/// A host promise.
///
/// Cloning yields another handle to the same promise.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Promise, PromiseState};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
/// let promise = Promise::new(&event_loop);
/// assert_eq!(promise.state(), PromiseState::Pending);
///
/// promise.resolve(Value::Smi(42));
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Rc<RefCell<PromiseInner>>,
    event_loop: EventLoop,
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Promise")
            .field("state", &inner.state)
            .field("result", &inner.result)
            .field("reactions", &inner.reactions.len())
            .finish()
    }
}

impl Promise {
    /// Creates a new pending Promise whose reactions run on `event_loop`.
    pub fn new(event_loop: &EventLoop) -> Self {
        Self::with_depth(event_loop, 0)
    }

    fn with_depth(event_loop: &EventLoop, depth: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PromiseInner {
                state: PromiseState::Pending,
                result: None,
                reactions: Vec::new(),
                already_resolved: false,
                depth,
                wrapper: None,
            })),
            event_loop: event_loop.clone(),
        }
    }

    /// Returns true if `value` wraps a host promise.
    pub fn is_promise(value: &Value) -> bool {
        Self::from_value(value).is_some()
    }

    /// Extracts the promise wrapped by `value`, if any.
    pub fn from_value(value: &Value) -> Option<Promise> {
        value.downcast_native::<Promise>()
    }

    /// Wraps this promise as a script value.
    ///
    /// While a wrapper is alive, further calls return that same object, so
    /// values of one promise compare equal.
    pub fn to_value(&self) -> Value {
        let cached = self.inner.borrow().wrapper.as_ref().and_then(Weak::upgrade);
        if let Some(object) = cached {
            return Value::NativeObject(object);
        }
        let value = Value::native(self.clone());
        if let Value::NativeObject(object) = &value {
            self.inner.borrow_mut().wrapper = Some(Rc::downgrade(object));
        }
        value
    }

    /// Returns true if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the event loop reactions are queued on.
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Returns the current state.
    pub fn state(&self) -> PromiseState {
        self.inner.borrow().state
    }

    /// Returns the fulfillment value or rejection reason once settled.
    pub fn result(&self) -> Option<Value> {
        self.inner.borrow().result.clone()
    }

    /// Returns the number of reactions waiting for settlement.
    pub fn reaction_count(&self) -> usize {
        self.inner.borrow().reactions.len()
    }

    /// Resolves the Promise with a value.
    ///
    /// If `value` is itself a promise, this promise adopts its eventual state.
    /// Resolving a promise with itself rejects it with a `TypeError`. If the
    /// Promise is already resolved, this is a no-op.
    pub fn resolve(&self, value: Value) {
        if self.inner.borrow().already_resolved {
            trace!("resolve ignored: promise already resolved");
            return;
        }
        self.resolve_unchecked(value);
    }

    /// Rejects the Promise with a reason.
    ///
    /// If the Promise is already resolved, this is a no-op.
    pub fn reject(&self, reason: Value) {
        if self.inner.borrow().already_resolved {
            trace!("reject ignored: promise already resolved");
            return;
        }
        self.settle(PromiseState::Rejected, reason);
    }

    /// Adds handlers for fulfillment and/or rejection.
    ///
    /// Returns a new Promise settled by the handler's result. A missing handler
    /// passes the outcome through unchanged. Fails with a `RangeError` when
    /// the chain is already `max_chain_depth` links long.
    pub fn then(
        &self,
        on_fulfilled: Option<Function>,
        on_rejected: Option<Function>,
    ) -> Result<Promise, JsError> {
        let depth = self.inner.borrow().depth + 1;
        let limit = self.event_loop.config().max_chain_depth;
        if depth > limit {
            return Err(JsError::range_error(format!(
                "promise chain exceeds {} continuations",
                limit
            )));
        }

        let derived = Promise::with_depth(&self.event_loop, depth);
        self.add_reaction(PromiseReaction {
            capability: derived.clone(),
            on_fulfilled,
            on_rejected,
        });
        Ok(derived)
    }

    fn resolve_unchecked(&self, value: Value) {
        self.inner.borrow_mut().already_resolved = true;

        if let Some(other) = Promise::from_value(&value) {
            if other.ptr_eq(self) {
                let error = JsError::type_error("Chaining cycle detected for promise");
                self.settle(PromiseState::Rejected, Value::from(error));
                return;
            }
            trace!("promise adopting another promise");
            other.add_reaction(PromiseReaction {
                capability: self.clone(),
                on_fulfilled: None,
                on_rejected: None,
            });
            return;
        }

        self.settle(PromiseState::Fulfilled, value);
    }

    fn settle(&self, state: PromiseState, value: Value) {
        let reactions = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != PromiseState::Pending {
                return;
            }
            inner.state = state;
            inner.result = Some(value.clone());
            inner.already_resolved = true;
            std::mem::take(&mut inner.reactions)
        };

        trace!(?state, reactions = reactions.len(), "promise settled");
        for reaction in reactions {
            self.enqueue_reaction_job(reaction, state, value.clone());
        }
    }

    fn add_reaction(&self, reaction: PromiseReaction) {
        let (state, value) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == PromiseState::Pending {
                inner.reactions.push(reaction);
                return;
            }
            (inner.state, inner.result.clone().unwrap_or(Value::Undefined))
        };
        self.enqueue_reaction_job(reaction, state, value);
    }

    fn enqueue_reaction_job(&self, reaction: PromiseReaction, state: PromiseState, value: Value) {
        self.event_loop.enqueue_microtask(MicroTask::new(move || {
            run_reaction_job(reaction, state, value);
            Ok(Value::Undefined)
        }));
    }
}

fn run_reaction_job(reaction: PromiseReaction, state: PromiseState, value: Value) {
    let PromiseReaction {
        capability,
        on_fulfilled,
        on_rejected,
    } = reaction;

    let handler = match state {
        PromiseState::Fulfilled => on_fulfilled,
        PromiseState::Rejected => on_rejected,
        PromiseState::Pending => return,
    };

    match handler {
        Some(mut handler) => match handler.call(vec![value]) {
            Ok(result) => capability.resolve_unchecked(result),
            Err(error) => {
                let error = error.with_frame(StackFrame::native("PromiseReactionJob"));
                capability.settle(PromiseState::Rejected, Value::from(error));
            }
        },
        None if state == PromiseState::Fulfilled => capability.resolve_unchecked(value),
        None => capability.settle(PromiseState::Rejected, value),
    }
}
