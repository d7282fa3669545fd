//! Event loop implementation.
//!
//! This module provides the single-threaded event loop that owns the task and
//! microtask queues. Each turn of the loop:
//! 1. Takes the oldest task from the task queue and executes it
//! 2. Drains all microtasks in the microtask queue
//!
//! `EventLoop` is a cheap handle: clones share the same queues, so a running
//! task or microtask may schedule more work on the loop that is running it.

use crate::config::{ConfigError, RuntimeConfig};
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskId, TaskQueue};
use core_types::{JsError, StackFrame};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Cancellable handle to a task scheduled with [`EventLoop::enqueue_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    id: TaskId,
}

impl TaskHandle {
    /// Returns the queue id of the scheduled task.
    pub fn id(&self) -> TaskId {
        self.id
    }
}

#[derive(Default)]
struct EventLoopInner {
    task_queue: RefCell<TaskQueue>,
    microtask_queue: RefCell<MicrotaskQueue>,
    config: RuntimeConfig,
}

/// The host event loop.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Task};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
///
/// let handle = event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
/// assert!(event_loop.cancel_task(handle));
/// event_loop.run_until_done().unwrap();
/// ```
#[derive(Clone, Default)]
pub struct EventLoop {
    inner: Rc<EventLoopInner>,
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("tasks", &self.pending_task_count())
            .field("microtasks", &self.inner.microtask_queue.borrow().len())
            .finish()
    }
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new EventLoop with the given limits.
    ///
    /// Fails with [`ConfigError::Invalid`] if a limit is zero.
    pub fn with_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(EventLoopInner {
                config,
                ..EventLoopInner::default()
            }),
        })
    }

    /// Returns the limits this loop was created with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Returns true if both handles refer to the same loop.
    pub fn ptr_eq(&self, other: &EventLoop) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Adds a task to the task queue.
    ///
    /// The task runs on a later turn; the returned handle can cancel it until then.
    pub fn enqueue_task(&self, task: Task) -> TaskHandle {
        let id = self.inner.task_queue.borrow_mut().enqueue(task);
        trace!(task = id.0, "task scheduled");
        TaskHandle { id }
    }

    /// Cancels a scheduled task.
    ///
    /// Returns false if the task already ran or was already cancelled.
    pub fn cancel_task(&self, handle: TaskHandle) -> bool {
        // The closure is dropped after the queue borrow ends; it may own
        // objects whose destructors touch this loop.
        let removed = self.inner.task_queue.borrow_mut().remove(handle.id);
        let cancelled = removed.is_some();
        drop(removed);
        trace!(task = handle.id.0, cancelled, "task cancel requested");
        cancelled
    }

    /// Returns true if the task is still waiting to run.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.inner.task_queue.borrow().contains(handle.id)
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask runs after the current task completes.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.inner.microtask_queue.borrow_mut().enqueue(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.inner.task_queue.borrow().is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.inner.microtask_queue.borrow().is_empty()
    }

    /// Returns the number of tasks waiting to run.
    pub fn pending_task_count(&self) -> usize {
        self.inner.task_queue.borrow().len()
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// Microtasks added while draining are processed before this returns.
    pub fn run_all_microtasks(&self) -> Result<(), JsError> {
        loop {
            let next = self.inner.microtask_queue.borrow_mut().dequeue();
            match next {
                Some(microtask) => {
                    microtask.run()?;
                }
                None => return Ok(()),
            }
        }
    }

    /// Processes one turn: one task (if any) followed by all microtasks.
    pub fn process_one_cycle(&self) -> Result<(), JsError> {
        let next = self.inner.task_queue.borrow_mut().dequeue();
        if let Some((id, task)) = next {
            trace!(task = id.0, "running task");
            task.run()
                .map_err(|e| e.with_frame(StackFrame::native("EventLoop::process_one_cycle")))?;
        }
        self.run_all_microtasks()
    }

    /// Runs turns until both queues are empty.
    ///
    /// Fails with an `InternalError` if the queues are still busy after
    /// `max_turns` turns.
    pub fn run_until_done(&self) -> Result<(), JsError> {
        let mut turns = 0usize;
        while !self.is_task_queue_empty() || !self.is_microtask_queue_empty() {
            if turns >= self.inner.config.max_turns {
                debug!(turns, "event loop turn limit reached");
                return Err(JsError::internal(format!(
                    "event loop did not drain within {} turns",
                    turns
                )));
            }
            self.process_one_cycle()?;
            turns += 1;
        }
        Ok(())
    }
}
