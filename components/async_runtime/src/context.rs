//! Suspendable execution contexts.
//!
//! An [`ExecutionContext`] models the host scope (document, worker, worklet)
//! that script objects live in. It can be suspended and resumed any number of
//! times and stopped exactly once. Objects that must follow these transitions
//! register as [`ContextLifecycleObserver`]s.

use crate::event_loop::EventLoop;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Lifecycle state of an execution context.
///
/// `Active ⇄ Suspended → Stopped`; Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Tasks bound to the context may run
    Active,
    /// Work is paused until the context resumes
    Suspended,
    /// The context is gone for good
    Stopped,
}

/// Receives lifecycle transitions of an execution context.
pub trait ContextLifecycleObserver {
    /// Called after the context moved from Active to Suspended.
    fn context_suspended(&self);
    /// Called after the context moved from Suspended to Active.
    fn context_resumed(&self);
    /// Called once, after the context stopped. No further calls follow.
    fn context_stopped(&self);
}

/// Identifies an observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct ContextInner {
    name: String,
    state: Cell<ContextState>,
    event_loop: EventLoop,
    observers: RefCell<Vec<(ObserverId, Weak<dyn ContextLifecycleObserver>)>>,
    next_observer_id: Cell<u64>,
}

/// A host execution scope that fans lifecycle transitions out to observers.
///
/// Cloning yields another handle to the same context.
///
/// # Examples
///
/// ```
/// use async_runtime::{ContextState, EventLoop, ExecutionContext};
///
/// let context = ExecutionContext::new("document", &EventLoop::new());
/// context.suspend();
/// assert_eq!(context.state(), ContextState::Suspended);
/// context.stop();
/// context.resume();
/// assert!(context.is_stopped());
/// ```
#[derive(Clone)]
pub struct ExecutionContext {
    inner: Rc<ContextInner>,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("name", &self.inner.name)
            .field("state", &self.inner.state.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl ExecutionContext {
    /// Creates an Active context whose tasks run on `event_loop`.
    pub fn new(name: impl Into<String>, event_loop: &EventLoop) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                name: name.into(),
                state: Cell::new(ContextState::Active),
                event_loop: event_loop.clone(),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(0),
            }),
        }
    }

    /// Returns the context's name, used in log output.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the event loop the context schedules work on.
    pub fn event_loop(&self) -> &EventLoop {
        &self.inner.event_loop
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ContextState {
        self.inner.state.get()
    }

    /// Returns true once the context has stopped.
    pub fn is_stopped(&self) -> bool {
        self.state() == ContextState::Stopped
    }

    /// Returns true while the context is suspended.
    pub fn is_suspended(&self) -> bool {
        self.state() == ContextState::Suspended
    }

    /// Returns true if both handles refer to the same context.
    pub fn ptr_eq(&self, other: &ExecutionContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers an observer.
    ///
    /// Observers are held weakly; registrations whose observer is gone are
    /// pruned here. Registering on a stopped context still returns an id,
    /// but the observer is never notified.
    pub fn add_observer(&self, observer: Weak<dyn ContextLifecycleObserver>) -> ObserverId {
        let id = ObserverId(self.inner.next_observer_id.get());
        self.inner.next_observer_id.set(id.0 + 1);
        if !self.is_stopped() {
            let mut observers = self.inner.observers.borrow_mut();
            observers.retain(|(_, registered)| registered.strong_count() > 0);
            observers.push((id, observer));
        }
        id
    }

    /// Unregisters an observer. Unknown ids are ignored.
    pub fn remove_observer(&self, id: ObserverId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(registered, _)| *registered != id);
    }

    /// Returns the number of live registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .borrow()
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }

    /// Moves an Active context to Suspended and notifies observers.
    pub fn suspend(&self) {
        if self.state() != ContextState::Active {
            return;
        }
        self.inner.state.set(ContextState::Suspended);
        debug!(context = %self.inner.name, "context suspended");
        for observer in self.live_observers() {
            observer.context_suspended();
        }
    }

    /// Moves a Suspended context back to Active and notifies observers.
    pub fn resume(&self) {
        if self.state() != ContextState::Suspended {
            return;
        }
        self.inner.state.set(ContextState::Active);
        debug!(context = %self.inner.name, "context resumed");
        for observer in self.live_observers() {
            observer.context_resumed();
        }
    }

    /// Stops the context, notifies every observer once and drops the list.
    pub fn stop(&self) {
        if self.is_stopped() {
            return;
        }
        self.inner.state.set(ContextState::Stopped);
        let observers = std::mem::take(&mut *self.inner.observers.borrow_mut());
        debug!(
            context = %self.inner.name,
            observers = observers.len(),
            "context stopped"
        );
        for (_, observer) in observers {
            if let Some(observer) = observer.upgrade() {
                observer.context_stopped();
            }
        }
    }

    /// Snapshot of the live observers; prunes dead registrations.
    fn live_observers(&self) -> Vec<Rc<dyn ContextLifecycleObserver>> {
        let mut observers = self.inner.observers.borrow_mut();
        observers.retain(|(_, observer)| observer.strong_count() > 0);
        observers
            .iter()
            .filter_map(|(_, observer)| observer.upgrade())
            .collect()
    }
}
