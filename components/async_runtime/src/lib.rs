//! Host runtime for the promise bridge.
//!
//! This crate provides the host collaborators that promise resolvers are
//! built on:
//! - [`EventLoop`] - single-threaded task and microtask queues with
//!   cancellable task handles
//! - [`Promise`] - the host promise primitive (resolve, reject, then)
//! - [`ExecutionContext`] - a suspendable, stoppable execution scope with
//!   lifecycle observers
//! - [`RuntimeConfig`] - loop and chain limits
//!
//! # Examples
//!
//! ## Event Loop Usage
//!
//! ```
//! use async_runtime::{EventLoop, Task};
//! use core_types::Value;
//!
//! let event_loop = EventLoop::new();
//! event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
//! event_loop.run_until_done().unwrap();
//! ```
//!
//! ## Promise Usage
//!
//! ```
//! use async_runtime::{EventLoop, Function, Promise, PromiseState};
//! use core_types::Value;
//!
//! let event_loop = EventLoop::new();
//! let promise = Promise::new(&event_loop);
//! let doubled = promise
//!     .then(
//!         Some(Function::new(|args| match args.first() {
//!             Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
//!             _ => Ok(Value::Undefined),
//!         })),
//!         None,
//!     )
//!     .unwrap();
//!
//! promise.resolve(Value::Smi(21));
//! event_loop.run_until_done().unwrap();
//! assert_eq!(doubled.state(), PromiseState::Fulfilled);
//! assert_eq!(doubled.result(), Some(Value::Smi(42)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod event_loop;
pub mod promise;
pub mod task_queue;

// Re-export main types at crate root
pub use config::{ConfigError, RuntimeConfig};
pub use context::{ContextLifecycleObserver, ContextState, ExecutionContext, ObserverId};
pub use event_loop::{EventLoop, TaskHandle};
pub use promise::{Function, Promise, PromiseReaction, PromiseState};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskId, TaskQueue};
