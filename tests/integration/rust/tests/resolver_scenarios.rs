//! End-to-end resolver behaviour on a live event loop.

use async_runtime::{ContextState, PromiseState};
use core_types::Value;
use integration_tests::{record, Harness, Outcome};
use pretty_assertions::assert_eq;
use script_promise::{ResolverState, ScriptPromise, ScriptPromiseResolver};

#[test]
fn resolve_is_observed_on_the_next_turn() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let p = r.promise();
    assert!(!p.is_empty());
    let log = record(&p);

    r.resolve("hello");
    assert!(log.borrow().is_empty());

    h.turn().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::from("hello"))]);
}

#[test]
fn second_resolve_is_ignored() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());

    r.resolve("hello");
    assert!(r.promise().is_empty());
    r.resolve("world");

    h.drain().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::from("hello"))]);
}

#[test]
fn first_reject_wins_over_later_calls() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());

    r.reject("hello");
    r.resolve("bye");
    r.reject("bye");

    h.drain().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Rejected(Value::from("hello"))]);
}

#[test]
fn stop_before_turn_cancels_settlement() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let p = r.promise();
    let log = record(&p);

    r.resolve("hello");
    h.context.stop();

    h.drain().unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(r.state(), ResolverState::Detached);
    assert_eq!(p.promise().unwrap().state(), PromiseState::Pending);
}

#[test]
fn keep_alive_holds_resolver_until_settled() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());
    r.keep_alive_while_pending();

    let weak = r.downgrade();
    drop(r);
    assert!(!weak.is_dropped());

    weak.upgrade().unwrap().resolve(Value::Smi(5));
    h.drain().unwrap();

    assert!(weak.is_dropped());
    assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::Smi(5))]);
}

#[test]
fn suspended_context_defers_until_resume() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());

    h.context.suspend();
    assert_eq!(h.context.state(), ContextState::Suspended);
    r.resolve("hello");

    h.drain().unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(r.state(), ResolverState::Resolving);

    h.context.resume();
    h.drain().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::from("hello"))]);
    assert_eq!(r.state(), ResolverState::Detached);
}

#[test]
fn suspend_after_scheduling_pulls_the_pending_task() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());

    r.reject("late");
    h.context.suspend();
    h.drain().unwrap();
    assert!(log.borrow().is_empty());

    h.context.resume();
    h.turn().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Rejected(Value::from("late"))]);
}

#[test]
fn stop_while_suspended_drops_owed_settlement() {
    let h = Harness::new();
    let r = ScriptPromiseResolver::new(&h.context);
    r.keep_alive_while_pending();
    let log = record(&r.promise());

    h.context.suspend();
    r.resolve(Value::Boolean(true));
    h.context.stop();
    h.drain().unwrap();

    assert!(log.borrow().is_empty());
    assert_eq!(r.state(), ResolverState::Detached);
    assert!(!r.is_keep_alive_active());
    assert_eq!(h.context.observer_count(), 0);
}

#[test]
fn many_resolvers_settle_in_call_order() {
    let h = Harness::new();
    let resolvers: Vec<_> = (0..4)
        .map(|_| ScriptPromiseResolver::new(&h.context))
        .collect();
    let logs: Vec<_> = resolvers.iter().map(|r| record(&r.promise())).collect();

    for (i, r) in resolvers.iter().enumerate().rev() {
        r.resolve(Value::Smi(i as i32));
    }

    h.turn().unwrap();
    assert_eq!(*logs[3].borrow(), vec![Outcome::Fulfilled(Value::Smi(3))]);
    assert!(logs[0].borrow().is_empty());

    h.drain().unwrap();
    for (i, log) in logs.iter().enumerate() {
        assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::Smi(i as i32))]);
    }
    assert_eq!(h.context.observer_count(), 0);
}

#[test]
fn resolving_with_a_promise_adopts_its_outcome() {
    let h = Harness::new();
    let inner = ScriptPromise::reject(&h.context, Value::from("inner"));
    let r = ScriptPromiseResolver::new(&h.context);
    let log = record(&r.promise());

    r.resolve(inner.to_value().unwrap());
    h.drain().unwrap();

    assert_eq!(*log.borrow(), vec![Outcome::Rejected(Value::from("inner"))]);
}

#[test]
fn then_chains_transform_values() {
    use async_runtime::Function;

    let h = Harness::new();
    let p = ScriptPromise::cast(&h.context, Value::Smi(20));
    let plus_one = p.then(
        Some(Function::new(|args| match args.first() {
            Some(Value::Smi(n)) => Ok(Value::Smi(n + 1)),
            _ => Ok(Value::Undefined),
        })),
        None,
    );
    let log = record(&plus_one);

    h.drain().unwrap();
    assert_eq!(*log.borrow(), vec![Outcome::Fulfilled(Value::Smi(21))]);
}
