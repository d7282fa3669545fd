//! Task and microtask queue management.
//!
//! Tasks are executed one at a time, with all microtasks draining after each
//! task. Queued tasks carry an id so that a scheduled task can be cancelled
//! before it runs.

use core_types::{JsError, Value};
use std::collections::VecDeque;

/// Identifies a task queued on a [`TaskQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// A task to be executed by the event loop.
///
/// Examples include deferred promise settlement and native completion callbacks.
pub struct Task {
    callback: Box<dyn FnOnce() -> Result<Value, JsError>>,
}

impl Task {
    /// Creates a new Task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Value, JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task.
    pub fn run(self) -> Result<Value, JsError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A microtask to be executed by the event loop.
///
/// Microtasks run after each task; promise reaction jobs are microtasks.
pub struct MicroTask {
    callback: Box<dyn FnOnce() -> Result<Value, JsError>>,
}

impl MicroTask {
    /// Creates a new MicroTask from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Value, JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask.
    pub fn run(self) -> Result<Value, JsError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MicroTask {{ ... }}")
    }
}

/// A FIFO queue of cancellable tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<(TaskId, Task)>,
    next_id: u64,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task to the end of the queue and returns its id.
    pub fn enqueue(&mut self, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.queue.push_back((id, task));
        id
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<(TaskId, Task)> {
        self.queue.pop_front()
    }

    /// Takes a queued task out of the queue without running it.
    ///
    /// Returns `None` if the task already ran or was removed.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.queue.iter().position(|(queued, _)| *queued == id)?;
        self.queue.remove(index).map(|(_, task)| task)
    }

    /// Returns true if the task is still waiting in the queue.
    pub fn contains(&self, id: TaskId) -> bool {
        self.queue.iter().any(|(queued, _)| *queued == id)
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// A queue for microtasks.
///
/// Microtasks are drained completely after each task.
#[derive(Debug, Default)]
pub struct MicrotaskQueue {
    queue: VecDeque<MicroTask>,
}

impl MicrotaskQueue {
    /// Creates a new empty MicrotaskQueue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a microtask to the end of the queue.
    pub fn enqueue(&mut self, microtask: MicroTask) {
        self.queue.push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&mut self) -> Option<MicroTask> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of microtasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
