//! Promise resolvers for native asynchronous operations.
//!
//! This crate bridges native completions onto script promises:
//! - [`ScriptPromiseResolver`] - resolve/reject once, settle on a later task,
//!   follow the owning context through suspend, resume and stop
//! - [`ScriptPromise`] - the possibly-empty promise handle given to callers,
//!   with `cast`, `reject` and `then`
//! - [`CallbackPromiseAdapter`] - feeds a native success/error completion
//!   into a resolver
//!
//! Nothing here reports errors to the caller: late or repeated settlement is
//! ignored, a stopped context silently cancels settlement, and an unusable
//! promise is an empty [`ScriptPromise`].
//!
//! # Examples
//!
//! ```
//! use async_runtime::{EventLoop, ExecutionContext, Function};
//! use core_types::Value;
//! use script_promise::ScriptPromiseResolver;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let event_loop = EventLoop::new();
//! let context = ExecutionContext::new("document", &event_loop);
//!
//! let resolver = ScriptPromiseResolver::new(&context);
//! let seen = Rc::new(RefCell::new(None));
//! let sink = seen.clone();
//! resolver.promise().then(
//!     Some(Function::new(move |args| {
//!         *sink.borrow_mut() = args.into_iter().next();
//!         Ok(Value::Undefined)
//!     })),
//!     None,
//! );
//!
//! resolver.resolve("hello");
//! resolver.resolve("world");
//! assert_eq!(*seen.borrow(), None);
//!
//! event_loop.process_one_cycle().unwrap();
//! assert_eq!(*seen.borrow(), Some(Value::from("hello")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod callbacks;
mod keep_alive;
mod resolver;
mod script_promise;

pub use callbacks::{CallbackPromiseAdapter, IntoScriptValue};
pub use resolver::{ResolverState, ScriptPromiseResolver, WeakScriptPromiseResolver};
pub use script_promise::ScriptPromise;
