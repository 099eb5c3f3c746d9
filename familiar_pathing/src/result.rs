// Shared handle between a caller and the worker running its path job.
//
// `PathResult` is cheap to clone; every clone refers to the same shared
// slot. The caller can request cancellation at any time (an atomic flag the
// search checks once per iteration). The worker publishes the outcome exactly
// once, under the mutex, then wakes waiters through the condvar. Readers
// only see the outcome after it has been published, so there is no window
// where a half-written result is visible. Alongside the outcome the worker
// records the engine's last `JobState`, so callers can tell a job that died
// mid-search (still `Searching`) from one that finalized a path.
//
// Poisoned locks are recovered rather than propagated: the protected data
// is a plain value that is either fully written or not written at all.

use crate::job::{JobState, SearchOutcome, Termination};
use crate::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lifecycle of a submitted job, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultStatus {
    /// Created but not yet picked up by a worker.
    Idle,
    /// A worker is searching.
    Computing,
    /// The worker published an outcome (reached, best-effort or faulted).
    Completed,
    /// The job ended because cancellation was requested.
    Cancelled,
}

#[derive(Debug)]
struct ResultState {
    status: ResultStatus,
    job_state: JobState,
    outcome: Option<SearchOutcome>,
}

#[derive(Debug)]
struct Shared {
    cancel: AtomicBool,
    state: Mutex<ResultState>,
    done: Condvar,
}

#[derive(Clone, Debug)]
pub struct PathResult {
    shared: Arc<Shared>,
}

impl Default for PathResult {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResult {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancel: AtomicBool::new(false),
                state: Mutex::new(ResultState {
                    status: ResultStatus::Idle,
                    job_state: JobState::Initialized,
                    outcome: None,
                }),
                done: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResultState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> ResultStatus {
        self.lock().status
    }

    /// Last engine state the worker reported: `Initialized` until picked
    /// up, `Searching` while running, then the state the job ended in.
    pub fn job_state(&self) -> JobState {
        self.lock().job_state
    }

    /// Ask the worker to stop. Takes effect at the next loop iteration, or
    /// before the search starts if it has not been picked up yet.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.shared.cancel.load(Ordering::Relaxed)
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status(), ResultStatus::Completed | ResultStatus::Cancelled)
    }

    /// Only meaningful once done: the search reached a true destination
    /// rather than a best-effort node.
    pub fn path_reaches_destination(&self) -> bool {
        self.lock()
            .outcome
            .as_ref()
            .is_some_and(SearchOutcome::reaches_destination)
    }

    /// The produced path, once done. `None` while running and for
    /// cancelled or faulted jobs.
    pub fn path(&self) -> Option<Path> {
        self.lock().outcome.as_ref().and_then(|o| o.path.clone())
    }

    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.lock().outcome.clone()
    }

    /// Block until the job is done.
    pub fn wait(&self) -> SearchOutcome {
        let mut state = self.lock();
        loop {
            if let Some(outcome) = state.outcome.as_ref() {
                return outcome.clone();
            }
            state = self
                .shared
                .done
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the job is done or `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SearchOutcome> {
        let state = self.lock();
        let (state, _) = self
            .shared
            .done
            .wait_timeout_while(state, timeout, |s| s.outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.outcome.clone()
    }

    // -- Worker side --

    pub(crate) fn cancel_flag(&self) -> &AtomicBool {
        &self.shared.cancel
    }

    pub(crate) fn mark_computing(&self) {
        let mut state = self.lock();
        if state.outcome.is_none() {
            state.status = ResultStatus::Computing;
            state.job_state = JobState::Searching;
        }
    }

    /// Publish the outcome and the job's final state. Later calls are ignored.
    pub(crate) fn publish(&self, outcome: SearchOutcome, job_state: JobState) {
        let mut state = self.lock();
        if state.outcome.is_some() {
            return;
        }
        state.status = if outcome.termination == Termination::Cancelled {
            ResultStatus::Cancelled
        } else {
            ResultStatus::Completed
        };
        state.job_state = job_state;
        state.outcome = Some(outcome);
        drop(state);
        self.shared.done.notify_all();
    }
}
