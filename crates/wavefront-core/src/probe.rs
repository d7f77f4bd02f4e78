// SPDX-License-Identifier: Apache-2.0

//! Engine instrumentation hooks.
//!
//! Every hook has an empty default body, so production callers pass
//! [`NullProbe`] and pay nothing. Tests install counting probes to check
//! the protocol invariants (single token in flight, no reentrant receive,
//! exactly T passes per actor, send/dispatch balance).

use crate::actor::ActorId;
use crate::channel::ChannelId;

/// Observer for token-engine protocol events.
///
/// Implementations must be `Sync`: hooks fire concurrently from every
/// worker thread.
pub trait Probe: Sync {
    /// A token send was attempted on `channel`. `suppressed` is true when
    /// the channel was already in flight and the send was dropped.
    fn on_send(&self, channel: ChannelId, suppressed: bool) {
        let _ = (channel, suppressed);
    }

    /// A worker dequeued `channel` from the ready queue.
    fn on_dispatch(&self, channel: ChannelId) {
        let _ = channel;
    }

    /// An actor's receive handler was entered (actor lock held).
    fn on_receive_enter(&self, actor: ActorId) {
        let _ = actor;
    }

    /// An actor's receive handler returned.
    fn on_receive_exit(&self, actor: ActorId) {
        let _ = actor;
    }

    /// An actor completed relaxation pass `pass` (1-based) on its row.
    fn on_relax(&self, actor: ActorId, pass: u32) {
        let _ = (actor, pass);
    }

    /// A worker observed global quiescence and exited its loop.
    fn on_worker_exit(&self) {}
}

/// No-op probe for production runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProbe;

impl Probe for NullProbe {}
