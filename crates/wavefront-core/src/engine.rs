// SPDX-License-Identifier: Apache-2.0

//! The scheduling engine: ready queue, worker parking, quiescence.
//!
//! Liveness-critical. A bug here shows up as deadlock (a parked worker is
//! never woken) or premature termination (workers exit with outstanding
//! work). Both are tested directly.
//!
//! Quiescence detection: a worker that finds the queue empty parks,
//! incrementing the idle count; the worker that brings the idle count to
//! `P` knows no channel is ready and no actor can make one ready (every
//! non-parked worker would be inside a receive handler, and all `P` are
//! parked), so it sets the monotonic `done` flag and broadcasts. Parked
//! workers exit without decrementing the idle count, which keeps the
//! live-worker observable at zero from that point on. Lost wakeups are
//! impossible because `enqueue` pushes and notifies under the same mutex
//! the parked workers wait on; spurious wakes are absorbed by the re-check
//! loop.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::channel::ChannelId;

/// What a worker gets back from [`Engine::dequeue_or_park`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A ready channel to process.
    Channel(ChannelId),
    /// Global quiescence: no ready work exists and none can appear.
    Terminated,
}

#[derive(Debug)]
struct EngineState {
    ready: VecDeque<ChannelId>,
    idle: usize,
    done: bool,
}

/// Shared ready-queue of channels awaiting dispatch.
#[derive(Debug)]
pub struct Engine {
    state: Mutex<EngineState>,
    ready_cv: Condvar,
    workers: usize,
}

impl Engine {
    /// Creates an engine for a pool of `workers` symmetric threads.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(workers: usize) -> Self {
        assert!(workers >= 1, "need at least one worker");
        Self {
            state: Mutex::new(EngineState {
                ready: VecDeque::new(),
                idle: 0,
                done: false,
            }),
            ready_cv: Condvar::new(),
            workers,
        }
    }

    // A panicking worker poisons the mutex, but every transition completes
    // under the guard, so the inner state is still consistent.
    fn locked(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `channel` to the ready queue and wakes one parked worker.
    ///
    /// The caller must have won the channel's in-flight slot first
    /// (duplicate suppression lives in `BoundaryChannel::try_send`).
    pub fn enqueue(&self, channel: ChannelId) {
        let mut st = self.locked();
        debug_assert!(!st.done, "enqueue after quiescence");
        st.ready.push_back(channel);
        self.ready_cv.notify_one();
    }

    /// Pops a ready channel, or parks until one appears or the run ends.
    pub fn dequeue_or_park(&self) -> Dispatch {
        let mut st = self.locked();
        loop {
            if let Some(ch) = st.ready.pop_front() {
                return Dispatch::Channel(ch);
            }
            if st.done {
                return Dispatch::Terminated;
            }

            st.idle += 1;
            debug_assert!(st.idle <= self.workers);
            if st.idle == self.workers {
                st.done = true;
                self.ready_cv.notify_all();
                return Dispatch::Terminated;
            }

            while st.ready.is_empty() && !st.done {
                st = self
                    .ready_cv
                    .wait(st)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if st.done {
                // Exit parked: the idle count stays at `workers`, keeping
                // the live-worker observable at zero exactly once.
                return Dispatch::Terminated;
            }
            st.idle -= 1;
        }
    }

    /// Number of workers not currently parked, in `[0, P]`.
    pub fn live_workers(&self) -> usize {
        let st = self.locked();
        self.workers - st.idle
    }

    /// True once global quiescence has been detected. Monotonic.
    pub fn is_quiescent(&self) -> bool {
        self.locked().done
    }
}
