//! Unit tests for resolver keep-alive

use crate::common::{observe, setup};
use core_types::Value;
use script_promise::ScriptPromiseResolver;

#[test]
fn unretained_pending_resolver_is_freed_with_its_handle() {
    let (_event_loop, context) = setup();
    let resolver = ScriptPromiseResolver::new(&context);
    let weak = resolver.downgrade();
    drop(resolver);
    assert!(weak.is_dropped());
    assert_eq!(context.observer_count(), 0);
}

#[test]
fn keep_alive_outlives_handles_until_settled() {
    let (event_loop, context) = setup();
    let resolver = ScriptPromiseResolver::new(&context);
    let observed = observe(&resolver.promise());
    let weak = resolver.downgrade();

    resolver.keep_alive_while_pending();
    resolver.keep_alive_while_pending();
    drop(resolver);
    assert!(!weak.is_dropped());

    weak.upgrade().unwrap().resolve("kept");
    assert!(!weak.is_dropped());

    event_loop.run_until_done().unwrap();
    assert!(weak.is_dropped());
    assert_eq!(observed.fulfilled(), vec![Value::from("kept")]);
}

#[test]
fn keep_alive_released_on_stop() {
    let (_event_loop, context) = setup();
    let resolver = ScriptPromiseResolver::new(&context);
    let weak = resolver.downgrade();
    resolver.keep_alive_while_pending();
    drop(resolver);

    context.stop();
    assert!(weak.is_dropped());
}

#[test]
fn keep_alive_after_resolve_is_noop() {
    let (event_loop, context) = setup();
    let resolver = ScriptPromiseResolver::new(&context);
    resolver.resolve(1);
    event_loop.run_until_done().unwrap();
    resolver.keep_alive_while_pending();
    assert!(!resolver.is_keep_alive_active());
}

#[test]
fn settlement_keeps_resolver_alive_without_opt_in() {
    let (event_loop, context) = setup();
    let resolver = ScriptPromiseResolver::new(&context);
    let observed = observe(&resolver.promise());
    let weak = resolver.downgrade();

    resolver.resolve("posted");
    drop(resolver);
    assert!(!weak.is_dropped());

    event_loop.run_until_done().unwrap();
    assert!(weak.is_dropped());
    assert_eq!(observed.fulfilled(), vec![Value::from("posted")]);
}
