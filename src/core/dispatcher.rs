//! # Dispatcher: deliver events to matching handlers.
//!
//! Looks up matching entries in the [`Registry`] and runs them under a
//! [`DispatchMode`], returning a [`Completion`].
//!
//! ## Flow
//! ```text
//! Blocking:
//!   matching(event) ─► for each entry (caller thread): invoke ─► fault? log + publish
//!                   ─► Completion::ready
//!
//! Concurrent:
//!   matching(event) ─► for each entry: pool.execute(job{ ticket, invoke })
//!                   ─► tracker.seal() ─► Completion (resolves when last ticket drops)
//! ```
//!
//! ## Rules
//! - No ordering among the handlers of one event.
//! - Blocking `dispatch_all` exhausts one event's handlers before the next event.
//! - Concurrent `dispatch_all` races all events; one completion covers every job.
//! - A handler failure is logged (`warn`) and published as a [`HandlerFault`];
//!   it never reaches the caller, the completion, or sibling handlers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::core::completion::{Completion, Tracker};
use crate::core::pool::WorkerPool;
use crate::core::registry::Registry;
use crate::error::HandlerError;
use crate::events::{Diagnostics, Event, HandlerFault};
use crate::handlers::HandlerEntry;

/// How matched handlers are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Sequentially on the caller's thread; returns after every handler finished.
    Blocking,
    /// One pool job per handler; returns immediately.
    #[default]
    Concurrent,
}

impl DispatchMode {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchMode::Blocking => "blocking",
            DispatchMode::Concurrent => "concurrent",
        }
    }
}

/// Runs one entry and reports its failure, if any.
#[derive(Clone)]
struct Invoker {
    bus: Arc<str>,
    diagnostics: Diagnostics,
}

impl Invoker {
    fn run(&self, entry: &HandlerEntry, event: &dyn Event) {
        if let Err(error) = entry.invoke(event) {
            self.report(entry, event, error);
        }
    }

    fn report(&self, entry: &HandlerEntry, event: &dyn Event, error: HandlerError) {
        let rendered = render_event(event);
        tracing::warn!(
            bus = %self.bus,
            handler = entry.name(),
            event_type = event.event_name(),
            event = %rendered,
            label = error.as_label(),
            error = %error,
            "handler failed while processing event"
        );
        self.diagnostics.publish(HandlerFault::new(
            entry.name_arc(),
            event.event_name(),
            rendered,
            error,
        ));
    }
}

/// `Debug` rendering of `event`, or its type name if `Debug` panics.
fn render_event(event: &dyn Event) -> String {
    catch_unwind(AssertUnwindSafe(|| format!("{event:?}")))
        .unwrap_or_else(|_| event.event_name().to_owned())
}

/// Matching and execution engine shared by every dispatch call of a bus.
pub(crate) struct Dispatcher {
    registry: Arc<Registry>,
    invoker: Invoker,
}

impl Dispatcher {
    pub(crate) fn new(bus: Arc<str>, registry: Arc<Registry>, diagnostics: Diagnostics) -> Self {
        Self {
            registry,
            invoker: Invoker { bus, diagnostics },
        }
    }

    /// Delivers one event.
    pub(crate) fn dispatch(
        &self,
        event: Arc<dyn Event>,
        mode: DispatchMode,
        pool: &dyn WorkerPool,
    ) -> Completion {
        self.dispatch_all(std::iter::once(event), mode, pool)
    }

    /// Delivers a sequence of events.
    pub(crate) fn dispatch_all<I>(
        &self,
        events: I,
        mode: DispatchMode,
        pool: &dyn WorkerPool,
    ) -> Completion
    where
        I: IntoIterator<Item = Arc<dyn Event>>,
    {
        match mode {
            DispatchMode::Blocking => {
                let invoked = events
                    .into_iter()
                    .map(|event| self.run_blocking(event.as_ref()))
                    .sum();
                Completion::ready(invoked)
            }
            DispatchMode::Concurrent => {
                let mut tracker = Tracker::new();
                for event in events {
                    self.submit(event, pool, &mut tracker);
                }
                tracker.seal()
            }
        }
    }

    /// Invokes every match on the calling thread. Returns the number invoked.
    fn run_blocking(&self, event: &dyn Event) -> usize {
        let matches = self.registry.matching(event);
        self.log_dispatch(event, DispatchMode::Blocking, matches.len());

        for entry in &matches {
            self.invoker.run(entry, event);
        }
        matches.len()
    }

    /// Submits one job per match to `pool`. Returns the number submitted.
    fn submit(&self, event: Arc<dyn Event>, pool: &dyn WorkerPool, tracker: &mut Tracker) -> usize {
        let matches = self.registry.matching(event.as_ref());
        self.log_dispatch(event.as_ref(), DispatchMode::Concurrent, matches.len());

        let submitted = matches.len();
        for entry in matches {
            let ticket = tracker.ticket();
            let event = Arc::clone(&event);
            let invoker = self.invoker.clone();

            pool.execute(Box::new(move || {
                invoker.run(&entry, event.as_ref());
                drop(ticket);
            }));
        }
        submitted
    }

    fn log_dispatch(&self, event: &dyn Event, mode: DispatchMode, matched: usize) {
        if matched == 0 {
            tracing::trace!(
                bus = %self.invoker.bus,
                event_type = event.event_name(),
                mode = mode.as_label(),
                "no handler accepts event"
            );
        } else {
            tracing::debug!(
                bus = %self.invoker.bus,
                event_type = event.event_name(),
                mode = mode.as_label(),
                matched,
                "dispatching event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pool::Job;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Ev(u32);
    impl Event for Ev {}

    /// Collects jobs instead of running them.
    #[derive(Default)]
    struct ManualPool {
        jobs: Mutex<Vec<Job>>,
    }

    impl ManualPool {
        fn run_all(&self) {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().expect("lock"));
            for job in jobs {
                job();
            }
        }
    }

    impl WorkerPool for ManualPool {
        fn execute(&self, job: Job) {
            self.jobs.lock().expect("lock").push(job);
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<Registry>, Diagnostics) {
        let registry = Arc::new(Registry::new());
        let diagnostics = Diagnostics::new(16);
        let d = Dispatcher::new("test".into(), Arc::clone(&registry), diagnostics.clone());
        (d, registry, diagnostics)
    }

    #[test]
    fn test_default_mode_is_concurrent() {
        assert_eq!(DispatchMode::default(), DispatchMode::Concurrent);
        assert_eq!(DispatchMode::Blocking.as_label(), "blocking");
    }

    #[test]
    fn test_concurrent_waits_for_pool() {
        let (d, registry, _) = dispatcher();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let h = Arc::clone(&hits);
            registry.insert(HandlerEntry::new("count", move |_: &Ev| {
                h.fetch_add(1, Ordering::SeqCst);
            }));
        }

        let pool = ManualPool::default();
        let done = d.dispatch(Arc::new(Ev(1)), DispatchMode::Concurrent, &pool);

        assert_eq!(done.handler_count(), 3);
        assert_eq!(done.pending(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        pool.run_all();
        assert!(done.is_complete());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_dropped_jobs_still_resolve() {
        let (d, registry, _) = dispatcher();
        registry.insert(HandlerEntry::new("never runs", |_: &Ev| {}));

        let pool = ManualPool::default();
        let done = d.dispatch(Arc::new(Ev(1)), DispatchMode::Concurrent, &pool);
        assert!(!done.is_complete());

        pool.jobs.lock().expect("lock").clear();
        assert!(done.is_complete());
    }

    #[test]
    fn test_blocking_reports_faults_and_continues() {
        let (d, registry, diagnostics) = dispatcher();
        let mut faults = diagnostics.subscribe();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.insert(HandlerEntry::new("fails", |_: &Ev| Err::<(), _>("bad input")));
        let h = Arc::clone(&hits);
        registry.insert(HandlerEntry::new("counts", move |_: &Ev| {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        let pool = ManualPool::default();
        let done = d.dispatch(Arc::new(Ev(9)), DispatchMode::Blocking, &pool);

        assert!(done.is_complete());
        assert_eq!(done.handler_count(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(pool.jobs.lock().expect("lock").is_empty());

        let fault = faults.try_recv().expect("fault published");
        assert_eq!(&*fault.handler, "fails");
        assert_eq!(&*fault.event, "Ev(9)");
        assert!(fault.event_type.ends_with("Ev"));
        assert_eq!(
            fault.error,
            HandlerError::Failed {
                reason: "bad input".into()
            }
        );
    }

    /// An event whose `Debug` rendering panics.
    struct Unprintable;
    impl Event for Unprintable {}
    impl std::fmt::Debug for Unprintable {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("no rendering")
        }
    }

    #[test]
    fn test_fault_report_survives_panicking_debug() {
        let (d, registry, diagnostics) = dispatcher();
        let mut faults = diagnostics.subscribe();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.insert(HandlerEntry::new("fails", |_: &Unprintable| Err::<(), _>("nope")));
        let h = Arc::clone(&hits);
        registry.insert(HandlerEntry::new("counts", move |_: &Unprintable| {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        let pool = ManualPool::default();
        let res = std::panic::catch_unwind(AssertUnwindSafe(|| {
            d.dispatch(Arc::new(Unprintable), DispatchMode::Blocking, &pool)
        }));

        let done = res.expect("dispatch does not unwind");
        assert!(done.is_complete());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let fault = faults.try_recv().expect("fault published");
        assert_eq!(&*fault.handler, "fails");
        assert!(fault.event.ends_with("Unprintable"));
        assert_eq!(&*fault.event, fault.event_type);
    }

    #[test]
    fn test_no_match_resolves_immediately() {
        let (d, _, _) = dispatcher();
        let pool = ManualPool::default();
        let done = d.dispatch(Arc::new(Ev(0)), DispatchMode::Concurrent, &pool);
        assert!(done.is_complete());
        assert_eq!(done.handler_count(), 0);
    }
}
