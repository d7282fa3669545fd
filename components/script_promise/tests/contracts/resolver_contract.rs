//! Contract tests for ScriptPromiseResolver
//!
//! Each test pins one guarantee callers of the resolver rely on.

use crate::common::{observe, setup};
use async_runtime::PromiseState;
use core_types::Value;
use script_promise::{ResolverState, ScriptPromiseResolver};

mod first_settlement_wins {
    use super::*;

    #[test]
    fn later_calls_have_no_effect() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let observed = observe(&resolver.promise());

        resolver.resolve("hello");
        resolver.resolve("world");
        resolver.reject("bye");
        event_loop.run_until_done().unwrap();

        assert_eq!(observed.fulfilled(), vec![Value::from("hello")]);
        assert!(observed.rejected().is_empty());
    }

    #[test]
    fn reject_then_resolve_keeps_rejection() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let observed = observe(&resolver.promise());

        resolver.reject("hello");
        resolver.resolve("bye");
        resolver.reject("bye");
        event_loop.run_until_done().unwrap();

        assert_eq!(observed.rejected(), vec![Value::from("hello")]);
        assert!(observed.fulfilled().is_empty());
    }
}

mod promise_availability {
    use super::*;

    #[test]
    fn non_empty_iff_pending() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        assert_eq!(resolver.state(), ResolverState::Pending);
        assert!(!resolver.promise().is_empty());

        resolver.resolve(Value::Undefined);
        assert!(resolver.promise().is_empty());
        event_loop.run_until_done().unwrap();
        assert!(resolver.promise().is_empty());
    }

    #[test]
    fn stopped_context_yields_detached_resolver() {
        let (_event_loop, context) = setup();
        context.stop();
        let resolver = ScriptPromiseResolver::new(&context);
        assert_eq!(resolver.state(), ResolverState::Detached);
        assert!(resolver.promise().is_empty());
    }
}

mod deferred_settlement {
    use super::*;

    #[test]
    fn never_settles_inside_resolve() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let promise = resolver.promise();
        let host = promise.promise().unwrap().clone();

        resolver.resolve(1);
        assert_eq!(host.state(), PromiseState::Pending);
        assert!(event_loop.is_microtask_queue_empty());

        event_loop.process_one_cycle().unwrap();
        assert_eq!(host.state(), PromiseState::Fulfilled);
    }

    #[test]
    fn second_call_in_settlement_window_is_ignored() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let observed = observe(&resolver.promise());

        resolver.resolve(1);
        assert_eq!(event_loop.pending_task_count(), 1);
        resolver.reject(2);
        assert_eq!(event_loop.pending_task_count(), 1);

        event_loop.run_until_done().unwrap();
        assert_eq!(observed.fulfilled(), vec![Value::Smi(1)]);
    }
}

mod context_lifecycle {
    use super::*;

    #[test]
    fn stop_detaches_synchronously() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let observed = observe(&resolver.promise());

        resolver.resolve("hello");
        context.stop();
        assert_eq!(resolver.state(), ResolverState::Detached);

        event_loop.run_until_done().unwrap();
        assert!(observed.nothing());
    }

    #[test]
    fn suspend_before_fire_delays_until_resume() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let observed = observe(&resolver.promise());

        resolver.resolve("hello");
        context.suspend();
        event_loop.run_until_done().unwrap();
        assert!(observed.nothing());

        context.resume();
        event_loop.run_until_done().unwrap();
        assert_eq!(observed.fulfilled(), vec![Value::from("hello")]);
    }
}

mod keep_alive {
    use super::*;

    #[test]
    fn repeated_opt_in_equals_one() {
        let (event_loop, context) = setup();
        let resolver = ScriptPromiseResolver::new(&context);
        let weak = resolver.downgrade();
        for _ in 0..5 {
            resolver.keep_alive_while_pending();
        }
        resolver.resolve(0);
        drop(resolver);
        event_loop.run_until_done().unwrap();
        assert!(weak.is_dropped());
    }
}
