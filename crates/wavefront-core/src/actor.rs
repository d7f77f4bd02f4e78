// SPDX-License-Identifier: Apache-2.0

//! Per-row actors and the wavefront dependency protocol.
//!
//! Each actor owns one interior grid row. It advances to iteration `k`
//! only after both neighbor channels confirm iteration `k - 1` (edge rows
//! are exempt on the missing side), which reproduces exactly the read/write
//! partial order of the sequential sweep: the anti-diagonal schedule in
//! message form, with no global barrier.
//!
//! A token may legitimately arrive before its sibling; the handler then
//! does nothing and waits for the token that completes the pair. The
//! satisfied-dependency fact is not lost: it lives in the channel state
//! (addressed-to-me, idle) until the actor fires and overwrites it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::channel::ChannelId;
use crate::runtime::{send, EngineCtx};
use crate::stencil::relax_row_shared;

/// Index of an actor in the runtime's actor arena.
///
/// Identity is carried explicitly rather than derived from allocation
/// layout; neighbor lookups go through the arena by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(pub usize);

/// Mutable progress of one actor, guarded by its private lock.
#[derive(Debug)]
pub(crate) struct Progress {
    /// Next iteration to perform, in `1..=T + 1`. The actor is terminal
    /// once this exceeds the pass bound.
    pub iter: u32,
}

/// Receive capability: how a worker hands a dequeued token to its target.
pub(crate) trait TokenHandler {
    /// Consumes one token: clears the channel slot under the actor's lock
    /// and runs the dependency check / relaxation step.
    fn receive(&self, token: ChannelId, ctx: &EngineCtx<'_>);
}

/// Owner of one interior grid row.
#[derive(Debug)]
pub(crate) struct RowActor {
    id: ActorId,
    /// Grid row this actor writes: `id.0 + 1`.
    row: usize,
    /// Channel toward the row above; `None` for the topmost actor.
    upper: Option<ChannelId>,
    /// Channel toward the row below; `None` for the bottommost actor.
    lower: Option<ChannelId>,
    progress: Mutex<Progress>,
}

impl RowActor {
    pub(crate) fn new(
        id: ActorId,
        row: usize,
        upper: Option<ChannelId>,
        lower: Option<ChannelId>,
    ) -> Self {
        Self {
            id,
            row,
            upper,
            lower,
            progress: Mutex::new(Progress { iter: 1 }),
        }
    }

    fn lock_progress(&self) -> MutexGuard<'_, Progress> {
        // Transitions complete under the guard; poisoned state is consistent.
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dependency check and relaxation step, under the actor's lock.
    fn step(&self, progress: &mut Progress, ctx: &EngineCtx<'_>) {
        ctx.probe.on_receive_enter(self.id);

        let upper_ok = self
            .upper
            .map_or(true, |c| ctx.channels[c.0].is_ready_for(self.id));
        let lower_ok = self
            .lower
            .map_or(true, |c| ctx.channels[c.0].is_ready_for(self.id));

        if upper_ok && lower_ok && progress.iter <= ctx.passes {
            relax_row_shared(ctx.grid, self.row);
            ctx.probe.on_relax(self.id, progress.iter);
            progress.iter += 1;

            if let Some(c) = self.upper {
                send(ctx, c, ActorId(self.id.0 - 1));
            }
            if let Some(c) = self.lower {
                send(ctx, c, ActorId(self.id.0 + 1));
            }
        }

        ctx.probe.on_receive_exit(self.id);
    }
}

impl TokenHandler for RowActor {
    fn receive(&self, token: ChannelId, ctx: &EngineCtx<'_>) {
        let mut progress = self.lock_progress();
        // Clearing the slot under the actor lock keeps "not in flight"
        // and "handler running" indistinguishable to concurrent senders.
        ctx.channels[token.0].mark_received();
        self.step(&mut progress, ctx);
    }
}
