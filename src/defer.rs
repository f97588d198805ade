use tracing::trace;

use crate::error::LoopError;
use crate::invoke::Invoke;
use crate::schedule::{Priority, Scheduler};

/// Runs `f(args...)` once on the thread driving `scheduler`'s loop, at idle priority.
///
/// The argument tuple is captured by value now; wrap an argument in `Shared` to let `f` see and
/// modify the caller's value instead. Returns as soon as the call is queued, so `f` has not run
/// yet. Whatever `f` returns is dropped.
///
/// Fails only if the loop refuses the registration (closed or full). Once queued, nothing about
/// the call is ever reported back here.
pub fn defer_to_loop_thread<S, F, Args>(scheduler: &S, f: F, args: Args) -> Result<(), LoopError>
where
    S: Scheduler,
    F: Invoke<Args> + Send + 'static,
    Args: Send + 'static,
{
    defer_with_priority(scheduler, Priority::Idle, f, args)
}

/// `defer_to_loop_thread` at a chosen priority.
pub fn defer_with_priority<S, F, Args>(
    scheduler: &S,
    priority: Priority,
    f: F,
    args: Args,
) -> Result<(), LoopError>
where
    S: Scheduler,
    F: Invoke<Args> + Send + 'static,
    Args: Send + 'static,
{
    trace!(?priority, "deferring call to loop thread");
    scheduler.schedule_with(priority, move || f.invoke(args))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::defer::{defer_to_loop_thread, defer_with_priority};
    use crate::runqueue::make_runqueue;
    use crate::schedule::{Priority, Scheduler};
    use crate::shared::Shared;

    #[test]
    fn nothing_runs_until_dispatched() {
        let (q, reactor) = make_runqueue();
        let hit = Shared::new(false);
        defer_to_loop_thread(&q, |h: Shared<bool>| h.set(true), (hit.clone(),)).unwrap();
        assert!(!hit.get());
        reactor.run_pending();
        assert!(hit.get());
    }

    #[test]
    fn idle_runs_after_default_work() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (q, reactor) = make_runqueue();
        let push = |o: Arc<Mutex<Vec<&'static str>>>, tag: &'static str| o.lock().unwrap().push(tag);

        defer_to_loop_thread(&q, push, (order.clone(), "idle")).unwrap();
        let o = order.clone();
        q.schedule(move || o.lock().unwrap().push("default")).unwrap();
        defer_with_priority(&q, Priority::High, push, (order.clone(), "high")).unwrap();

        reactor.run_pending();
        assert_eq!(vec!["high", "default", "idle"], *order.lock().unwrap());
    }

    #[test]
    fn values_captured_at_submission() {
        let (q, reactor) = make_runqueue();
        let seen = Shared::new(0);
        let mut x = 1;
        defer_to_loop_thread(&q, |v: i32, out: Shared<i32>| out.set(v), (x, seen.clone())).unwrap();
        x = 2;
        reactor.run_pending();
        assert_eq!(1, seen.get());
        assert_eq!(2, x);
    }
}
