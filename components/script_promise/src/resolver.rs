//! Promise resolvers with deferred settlement.
//!
//! A [`ScriptPromiseResolver`] owns one host promise and the state machine
//! that decides if and when it settles:
//!
//! ```text
//! Pending ──resolve──▶ Resolving ──┐
//!    │    ──reject───▶ Rejecting ──┼──settled / context stopped──▶ Detached
//!    └──────────context stopped────┘
//! ```
//!
//! `resolve`/`reject` never settle synchronously. They record the value and
//! post a settlement task to the context's event loop, so reactions always run
//! after the caller's stack has unwound. The task is withdrawn while the
//! context is suspended, reposted on resume, and cancelled for good when the
//! context stops.

use crate::keep_alive::KeepAlive;
use crate::script_promise::ScriptPromise;
use async_runtime::{
    ContextLifecycleObserver, ContextState, ExecutionContext, ObserverId, Promise, Task,
    TaskHandle,
};
use core_types::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// State of a [`ScriptPromiseResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Waiting for `resolve` or `reject`
    Pending,
    /// Resolved; fulfillment is waiting for its settlement task
    Resolving,
    /// Rejected; rejection is waiting for its settlement task
    Rejecting,
    /// Settled or cancelled; the resolver is inert
    Detached,
}

struct ResolverInner {
    this: Weak<ResolverInner>,
    context: ExecutionContext,
    promise: Option<Promise>,
    state: Cell<ResolverState>,
    value: RefCell<Option<Value>>,
    settlement: Cell<Option<TaskHandle>>,
    keep_alive: KeepAlive<ResolverInner>,
    observer: Cell<Option<ObserverId>>,
    promise_retrieved: Cell<bool>,
}

/// Resolves or rejects a promise on a later task, following its context.
///
/// Cloning yields another handle to the same resolver. Dropping every handle
/// while Pending is allowed and settles nothing.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, ExecutionContext, PromiseState};
/// use core_types::Value;
/// use script_promise::ScriptPromiseResolver;
///
/// let event_loop = EventLoop::new();
/// let context = ExecutionContext::new("document", &event_loop);
///
/// let resolver = ScriptPromiseResolver::new(&context);
/// let promise = resolver.promise();
/// resolver.resolve(Value::from("hello"));
///
/// let host = promise.promise().unwrap();
/// assert_eq!(host.state(), PromiseState::Pending);
/// event_loop.process_one_cycle().unwrap();
/// assert_eq!(host.result(), Some(Value::from("hello")));
/// ```
#[derive(Clone)]
pub struct ScriptPromiseResolver {
    inner: Rc<ResolverInner>,
}

impl fmt::Debug for ScriptPromiseResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptPromiseResolver")
            .field("state", &self.inner.state.get())
            .field("context", &self.inner.context.name())
            .field("keep_alive", &self.inner.keep_alive.is_active())
            .finish()
    }
}

impl ScriptPromiseResolver {
    /// Creates a resolver bound to `context`.
    ///
    /// A resolver created in a stopped context starts out Detached and owns
    /// no promise.
    pub fn new(context: &ExecutionContext) -> Self {
        let stopped = context.is_stopped();
        let inner = Rc::new_cyclic(|this| ResolverInner {
            this: this.clone(),
            context: context.clone(),
            promise: (!stopped).then(|| Promise::new(context.event_loop())),
            state: Cell::new(if stopped {
                ResolverState::Detached
            } else {
                ResolverState::Pending
            }),
            value: RefCell::new(None),
            settlement: Cell::new(None),
            keep_alive: KeepAlive::new(),
            observer: Cell::new(None),
            promise_retrieved: Cell::new(false),
        });

        if stopped {
            debug!(context = %context.name(), "resolver created in stopped context");
        } else {
            let observer = Rc::downgrade(&inner) as Weak<dyn ContextLifecycleObserver>;
            inner.observer.set(Some(context.add_observer(observer)));
        }

        Self { inner }
    }

    /// Returns the promise this resolver settles.
    ///
    /// Only returns a usable handle while the resolver is Pending; fetch it
    /// before starting the operation that will call `resolve`/`reject`.
    pub fn promise(&self) -> ScriptPromise {
        let inner = &self.inner;
        if inner.state.get() != ResolverState::Pending {
            trace!(state = ?inner.state.get(), "promise requested after settlement began");
            return ScriptPromise::empty();
        }
        if cfg!(debug_assertions) && inner.promise_retrieved.replace(true) {
            warn!(context = %inner.context.name(), "resolver promise retrieved more than once");
        }
        match &inner.promise {
            Some(promise) => ScriptPromise::from_promise(promise.clone()),
            None => ScriptPromise::empty(),
        }
    }

    /// Fulfills the promise with `value` on a later task.
    ///
    /// Ignored unless the resolver is Pending.
    pub fn resolve(&self, value: impl Into<Value>) {
        self.inner
            .resolve_or_reject(value.into(), ResolverState::Resolving);
    }

    /// Rejects the promise with `reason` on a later task.
    ///
    /// Ignored unless the resolver is Pending.
    pub fn reject(&self, reason: impl Into<Value>) {
        self.inner
            .resolve_or_reject(reason.into(), ResolverState::Rejecting);
    }

    /// Keeps the resolver alive while it is Pending, even with no handles left.
    ///
    /// Released automatically when the resolver detaches. Calling it again, or
    /// after `resolve`/`reject`, is a no-op.
    pub fn keep_alive_while_pending(&self) {
        if self.inner.state.get() != ResolverState::Pending {
            return;
        }
        self.inner.retain();
    }

    /// Returns the current state.
    pub fn state(&self) -> ResolverState {
        self.inner.state.get()
    }

    /// Returns the context the resolver is bound to.
    pub fn context(&self) -> &ExecutionContext {
        &self.inner.context
    }

    /// Returns true while the resolver holds a reference to itself.
    pub fn is_keep_alive_active(&self) -> bool {
        self.inner.keep_alive.is_active()
    }

    /// Returns a weak handle, for observing whether the resolver is still alive.
    pub fn downgrade(&self) -> WeakScriptPromiseResolver {
        WeakScriptPromiseResolver {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`ScriptPromiseResolver`].
#[derive(Clone)]
pub struct WeakScriptPromiseResolver {
    inner: Weak<ResolverInner>,
}

impl WeakScriptPromiseResolver {
    /// Returns the resolver if something still keeps it alive.
    pub fn upgrade(&self) -> Option<ScriptPromiseResolver> {
        self.inner
            .upgrade()
            .map(|inner| ScriptPromiseResolver { inner })
    }

    /// Returns true if the resolver has been freed.
    pub fn is_dropped(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl ResolverInner {
    fn resolve_or_reject(&self, value: Value, new_state: ResolverState) {
        let current = self.state.get();
        if current != ResolverState::Pending {
            trace!(state = ?current, requested = ?new_state, "stale settlement ignored");
            return;
        }

        self.state.set(new_state);
        *self.value.borrow_mut() = Some(value);

        match self.context.state() {
            ContextState::Stopped => self.detach(),
            ContextState::Suspended => {
                self.retain();
                debug!(
                    context = %self.context.name(),
                    state = ?new_state,
                    "settlement owed until context resumes"
                );
            }
            ContextState::Active => {
                self.retain();
                self.schedule_settlement();
            }
        }
    }

    fn retain(&self) {
        if let Some(this) = self.this.upgrade() {
            if self.keep_alive.retain(this) {
                trace!(context = %self.context.name(), "resolver keep-alive taken");
            }
        }
    }

    fn schedule_settlement(&self) {
        if self.settlement.get().is_some() {
            return;
        }
        let this = self.this.clone();
        let handle = self.context.event_loop().enqueue_task(Task::new(move || {
            if let Some(resolver) = this.upgrade() {
                resolver.run_settlement();
            }
            Ok(Value::Undefined)
        }));
        self.settlement.set(Some(handle));
    }

    fn cancel_settlement(&self) {
        if let Some(handle) = self.settlement.take() {
            self.context.event_loop().cancel_task(handle);
        }
    }

    fn run_settlement(&self) {
        self.settlement.set(None);
        match self.context.state() {
            ContextState::Stopped => {
                self.detach();
                return;
            }
            // Resume posts a fresh task.
            ContextState::Suspended => return,
            ContextState::Active => {}
        }

        let state = self.state.get();
        let value = self.value.borrow_mut().take().unwrap_or(Value::Undefined);
        if let Some(promise) = &self.promise {
            match state {
                ResolverState::Resolving => promise.resolve(value),
                ResolverState::Rejecting => promise.reject(value),
                ResolverState::Pending | ResolverState::Detached => {}
            }
        }
        debug!(context = %self.context.name(), ?state, "resolver settled");
        self.detach();
    }

    /// Terminal: cancels pending work, drops the value, unregisters and
    /// releases the keep-alive.
    fn detach(&self) {
        let previous = self.state.replace(ResolverState::Detached);
        self.cancel_settlement();
        self.value.borrow_mut().take();
        if let Some(id) = self.observer.take() {
            self.context.remove_observer(id);
        }
        let released = self.keep_alive.release();
        if previous != ResolverState::Detached {
            trace!(context = %self.context.name(), from = ?previous, "resolver detached");
        }
        drop(released);
    }
}

impl ContextLifecycleObserver for ResolverInner {
    fn context_suspended(&self) {
        if let Some(handle) = self.settlement.take() {
            self.context.event_loop().cancel_task(handle);
            debug!(context = %self.context.name(), "settlement withheld while suspended");
        }
    }

    fn context_resumed(&self) {
        if matches!(
            self.state.get(),
            ResolverState::Resolving | ResolverState::Rejecting
        ) {
            self.schedule_settlement();
        }
    }

    fn context_stopped(&self) {
        self.detach();
    }
}
