//! # Worker pool seam for concurrent dispatch.
//!
//! Concurrent dispatch submits one [`Job`] per matching handler to a [`WorkerPool`].
//! The pool is owned by the host application: the bus only submits work and never
//! manages capacity, queueing or shutdown.
//!
//! ## Provided implementation
//! [`tokio::runtime::Handle`] implements `WorkerPool` by running each job with
//! `spawn_blocking`, since handlers are synchronous and may block.
//!
//! ## Custom pools
//! ```rust
//! use std::thread;
//! use event_aggregator::{Job, WorkerPool};
//!
//! /// Runs every job on a fresh OS thread.
//! struct ThreadPerJob;
//!
//! impl WorkerPool for ThreadPerJob {
//!     fn execute(&self, job: Job) {
//!         thread::spawn(job);
//!     }
//! }
//! ```
//!
//! A pool that drops a job without running it (e.g. during shutdown) still lets the
//! dispatch's [`Completion`](crate::Completion) resolve.

use tokio::runtime::Handle;

/// A unit of work submitted by concurrent dispatch.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes submitted jobs, possibly in parallel.
pub trait WorkerPool: Send + Sync + 'static {
    /// Schedules `job` for execution. Must not run it on the caller's thread
    /// if concurrent dispatch is expected to return immediately.
    fn execute(&self, job: Job);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl WorkerPool for Handle {
    fn execute(&self, job: Job) {
        // Detached: completion is tracked by the job's ticket, not the JoinHandle.
        drop(self.spawn_blocking(job));
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_tokio_handle_runs_job_off_thread() {
        let (tx, rx) = mpsc::channel();
        let caller = std::thread::current().id();

        Handle::current().execute(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));

        let ran_on = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .expect("join")
            .expect("job ran");
        assert_ne!(ran_on, caller);
        assert_eq!(WorkerPool::name(&Handle::current()), "tokio");
    }
}
