//! # Completion handle: "every handler of this dispatch has finished".
//!
//! A [`Completion`] aggregates the finish of N independently running handler jobs.
//! Blocking dispatch returns one that is already resolved; concurrent dispatch
//! returns one that resolves when the last job drops its [`Ticket`].
//!
//! ## Architecture
//! ```text
//! Tracker::new()            pending = 1 (tracker's own hold)
//!   ├─ ticket() ──► job 1   pending += 1
//!   ├─ ticket() ──► job N   pending += 1
//!   └─ seal() ──► Completion   pending -= 1
//!
//! job finishes (or is dropped unrun) → Ticket::drop → pending -= 1
//! pending == 0 → wake blocking waiters (Condvar)
//!              → wake async waiters (watch)
//!              → run on_complete continuations on this thread
//! ```
//!
//! ## Rules
//! - Resolution never carries a handler error: failures are isolated upstream.
//! - Timeouts abandon the wait only; jobs are **not** cancelled.
//! - A job dropped by the pool without running still counts as finished.
//! - Continuations run on whichever thread finishes last (or inline, if already resolved).

use std::fmt;
use std::future::IntoFuture;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use parking_lot::{Condvar, Mutex};
use tokio::sync::watch;

use crate::error::{HandlerError, WaitError};

type Continuation = Box<dyn FnOnce() + Send + 'static>;

struct State {
    pending: usize,
    continuations: Vec<Continuation>,
}

struct Shared {
    state: Mutex<State>,
    cond: Condvar,
    done: watch::Sender<bool>,
}

impl Shared {
    fn new(pending: usize) -> Arc<Self> {
        let (done, _rx) = watch::channel(pending == 0);
        Arc::new(Self {
            state: Mutex::new(State {
                pending,
                continuations: Vec::new(),
            }),
            cond: Condvar::new(),
            done,
        })
    }

    fn acquire(&self) {
        self.state.lock().pending += 1;
    }

    fn release(&self) {
        let continuations = {
            let mut state = self.state.lock();
            state.pending = state.pending.saturating_sub(1);
            if state.pending > 0 {
                return;
            }
            std::mem::take(&mut state.continuations)
        };

        self.cond.notify_all();
        self.done.send_replace(true);
        for continuation in continuations {
            run_continuation(continuation);
        }
    }
}

fn run_continuation(continuation: Continuation) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(continuation)) {
        let err = HandlerError::from_panic(payload.as_ref());
        tracing::warn!(error = %err, "completion continuation panicked");
    }
}

/// Keeps a [`Completion`] unresolved while alive.
///
/// One ticket travels with each submitted job and is dropped when the job ends.
pub(crate) struct Ticket {
    shared: Arc<Shared>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.shared.release();
    }
}

/// Issues tickets for one dispatch, then seals into a [`Completion`].
///
/// Holds the completion open until sealed, so jobs finishing early cannot resolve
/// it before every job has been submitted.
pub(crate) struct Tracker {
    shared: Arc<Shared>,
    issued: usize,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        Self {
            shared: Shared::new(1),
            issued: 0,
        }
    }

    pub(crate) fn ticket(&mut self) -> Ticket {
        self.shared.acquire();
        self.issued += 1;
        Ticket {
            shared: Arc::clone(&self.shared),
        }
    }

    pub(crate) fn seal(self) -> Completion {
        let completion = Completion {
            shared: Arc::clone(&self.shared),
            handlers: self.issued,
        };
        drop(self);
        completion
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shared.release();
    }
}

/// Awaitable aggregate of one dispatch's handler invocations.
///
/// Cheap to clone; all clones observe the same resolution.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use event_aggregator::{DispatchMode, Event, EventBus};
///
/// #[derive(Debug)]
/// struct Ping;
/// impl Event for Ping {}
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bus = EventBus::builder(Default::default()).build()?;
///     bus.register_callback(|_: &Ping| std::thread::sleep(Duration::from_millis(10)));
///
///     let done = bus.dispatch(Ping, DispatchMode::Concurrent);
///     done.on_complete(|| println!("all handlers finished"));
///     done.wait_timeout(Duration::from_secs(1)).await?;
///     assert!(done.is_complete());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Completion {
    shared: Arc<Shared>,
    handlers: usize,
}

impl Completion {
    /// A handle that is already resolved, for work finished on the caller's thread.
    pub(crate) fn ready(handlers: usize) -> Self {
        Self {
            shared: Shared::new(0),
            handlers,
        }
    }

    /// Number of handler invocations this handle tracks.
    #[inline]
    pub fn handler_count(&self) -> usize {
        self.handlers
    }

    /// Number of tracked invocations still running.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending
    }

    /// True once every tracked invocation has finished.
    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }

    /// Waits until every tracked invocation has finished.
    pub async fn wait(&self) {
        let mut rx = self.shared.done.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Waits up to `timeout` for every tracked invocation to finish.
    ///
    /// On timeout the running handlers are left alone; only the wait is abandoned.
    pub async fn wait_timeout(&self, timeout: Duration) -> Result<(), WaitError> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(()) => Ok(()),
            Err(_elapsed) => Err(WaitError::Timeout {
                timeout,
                pending: self.pending(),
            }),
        }
    }

    /// Blocks the current thread for up to `timeout` until every tracked invocation finishes.
    ///
    /// For synchronous callers. Do not call from an async task: it parks the thread.
    pub fn wait_blocking(&self, timeout: Duration) -> Result<(), WaitError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.pending > 0 {
            if self.shared.cond.wait_until(&mut state, deadline).timed_out() && state.pending > 0 {
                return Err(WaitError::Timeout {
                    timeout,
                    pending: state.pending,
                });
            }
        }
        Ok(())
    }

    /// Runs `continuation` once every tracked invocation has finished.
    ///
    /// Runs immediately on the calling thread if already resolved; otherwise on the
    /// thread that finishes the last invocation, typically a pool thread.
    /// A panicking continuation is caught and logged.
    pub fn on_complete<F>(&self, continuation: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        if state.pending == 0 {
            drop(state);
            run_continuation(Box::new(continuation));
        } else {
            state.continuations.push(Box::new(continuation));
        }
    }
}

impl IntoFuture for Completion {
    type Output = ();
    type IntoFuture = BoxFuture<'static, ()>;

    fn into_future(self) -> Self::IntoFuture {
        async move { self.wait().await }.boxed()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("handlers", &self.handlers)
            .field("pending", &self.pending())
            .finish()
    }
}
