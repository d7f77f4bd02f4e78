// SPDX-License-Identifier: Apache-2.0

//! Bootstrap/driver for the token engine.
//!
//! Builds the actor and channel arenas, seeds the first token, runs the
//! worker pool to quiescence, and joins. Channel `i` sits between actors
//! `i` and `i + 1` and starts idle, addressed to actor `i`; the single
//! seeded token on channel 0 is enough to start the wavefront.

use thiserror::Error;

use crate::actor::{ActorId, RowActor, TokenHandler};
use crate::channel::{BoundaryChannel, ChannelId};
use crate::engine::{Dispatch, Engine};
use crate::grid::SharedGrid;
use crate::probe::Probe;
use crate::stencil::relax_row_shared;

/// Rejected run configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The grid has no interior to relax.
    #[error("grid must be at least 3x3 (got {rows}x{cols})")]
    GridTooSmall {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// Zero passes were requested.
    #[error("at least one relaxation pass is required")]
    ZeroPasses,
    /// Zero workers were requested.
    #[error("at least one worker is required")]
    ZeroWorkers,
}

/// Shared references every worker needs. Borrowed for the run's lifetime;
/// the arenas are owned by the driver.
#[derive(Clone, Copy)]
pub(crate) struct EngineCtx<'a> {
    pub grid: &'a SharedGrid,
    pub channels: &'a [BoundaryChannel],
    pub actors: &'a [RowActor],
    pub engine: &'a Engine,
    pub passes: u32,
    pub probe: &'a dyn Probe,
}

/// Deposits a token on `channel` addressed to `to` and, if the slot was
/// won, enqueues the channel for dispatch. A suppressed send is normal
/// operation, not an error.
pub(crate) fn send(ctx: &EngineCtx<'_>, channel: ChannelId, to: ActorId) {
    let accepted = ctx.channels[channel.0].try_send(to);
    ctx.probe.on_send(channel, !accepted);
    if accepted {
        ctx.engine.enqueue(channel);
    }
}

fn worker_loop(ctx: &EngineCtx<'_>) {
    loop {
        match ctx.engine.dequeue_or_park() {
            Dispatch::Terminated => {
                ctx.probe.on_worker_exit();
                return;
            }
            Dispatch::Channel(ch) => {
                ctx.probe.on_dispatch(ch);
                // While in flight the addressee bits are stable: this
                // worker exclusively owns the token until mark_received.
                let target = ctx.channels[ch.0].addressee();
                ctx.actors[target.0].receive(ch, ctx);
            }
        }
    }
}

/// Runs `passes` relaxation sweeps with the token engine on `workers`
/// pool threads. Bit-identical to [`crate::relax_sequential`] on the same
/// starting grid.
///
/// Blocks until global quiescence; every worker has exited when this
/// returns.
///
/// # Errors
///
/// Returns [`ConfigError`] for degenerate configurations. Inside a valid
/// run there are no recoverable errors.
pub fn relax_token_engine(
    grid: &SharedGrid,
    passes: u32,
    workers: usize,
    probe: &dyn Probe,
) -> Result<(), ConfigError> {
    let (rows, cols) = (grid.rows(), grid.cols());
    if rows < 3 || cols < 3 {
        return Err(ConfigError::GridTooSmall { rows, cols });
    }
    if passes == 0 {
        return Err(ConfigError::ZeroPasses);
    }
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }

    let interior = rows - 2;

    // Exactly one interior row: no channels exist, both dependencies are
    // auto-satisfied, and there is nothing to schedule; run the passes
    // directly instead of leaving the edge case to the pool.
    if interior == 1 {
        let actor = ActorId(0);
        for pass in 1..=passes {
            relax_row_shared(grid, 1);
            probe.on_relax(actor, pass);
        }
        return Ok(());
    }

    let actors: Vec<RowActor> = (0..interior)
        .map(|i| {
            RowActor::new(
                ActorId(i),
                i + 1,
                (i > 0).then(|| ChannelId(i - 1)),
                (i < interior - 1).then(|| ChannelId(i)),
            )
        })
        .collect();
    let channels: Vec<BoundaryChannel> = (0..interior - 1)
        .map(|i| BoundaryChannel::new(ActorId(i)))
        .collect();
    let engine = Engine::new(workers);

    let ctx = EngineCtx {
        grid,
        channels: &channels,
        actors: &actors,
        engine: &engine,
        passes,
        probe,
    };

    send(&ctx, ChannelId(0), ActorId(0));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let ctx = &ctx;
                s.spawn(move || worker_loop(ctx))
            })
            .collect();

        for h in handles {
            if let Err(e) = h.join() {
                std::panic::resume_unwind(e);
            }
        }
    });

    debug_assert!(engine.is_quiescent());
    debug_assert_eq!(engine.live_workers(), 0);
    debug_assert!(
        channels.iter().all(|c| !c.is_in_flight()),
        "token left in flight after quiescence"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::probe::NullProbe;

    #[test]
    fn rejects_degenerate_configs() {
        let grid = SharedGrid::from_grid(&Grid::zeroed(2, 5));
        assert_eq!(
            relax_token_engine(&grid, 1, 1, &NullProbe),
            Err(ConfigError::GridTooSmall { rows: 2, cols: 5 })
        );

        let grid = SharedGrid::from_grid(&Grid::zeroed(5, 5));
        assert_eq!(
            relax_token_engine(&grid, 0, 1, &NullProbe),
            Err(ConfigError::ZeroPasses)
        );
        assert_eq!(
            relax_token_engine(&grid, 1, 0, &NullProbe),
            Err(ConfigError::ZeroWorkers)
        );
    }
}
