//! Shared fixtures for script_promise tests.

#![allow(dead_code)]

use async_runtime::{EventLoop, ExecutionContext, Function};
use core_types::Value;
use script_promise::ScriptPromise;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Routes resolver transitions to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An event loop with one Active context on it.
pub fn setup() -> (EventLoop, ExecutionContext) {
    init_tracing();
    let event_loop = EventLoop::new();
    let context = ExecutionContext::new("test-document", &event_loop);
    (event_loop, context)
}

/// Records what a promise's reactions were called with.
#[derive(Clone, Default)]
pub struct Observed {
    pub fulfilled: Rc<RefCell<Vec<Value>>>,
    pub rejected: Rc<RefCell<Vec<Value>>>,
}

impl Observed {
    pub fn fulfilled(&self) -> Vec<Value> {
        self.fulfilled.borrow().clone()
    }

    pub fn rejected(&self) -> Vec<Value> {
        self.rejected.borrow().clone()
    }

    pub fn nothing(&self) -> bool {
        self.fulfilled.borrow().is_empty() && self.rejected.borrow().is_empty()
    }
}

fn sink(log: &Rc<RefCell<Vec<Value>>>) -> Function {
    let log = log.clone();
    Function::new(move |args| {
        log.borrow_mut()
            .push(args.into_iter().next().unwrap_or(Value::Undefined));
        Ok(Value::Undefined)
    })
}

/// Attaches fulfillment and rejection observers to `promise`.
pub fn observe(promise: &ScriptPromise) -> Observed {
    let observed = Observed::default();
    let chained = promise.then(
        Some(sink(&observed.fulfilled)),
        Some(sink(&observed.rejected)),
    );
    assert!(!chained.is_empty(), "observers could not be attached");
    observed
}
