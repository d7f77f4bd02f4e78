// SPDX-License-Identifier: Apache-2.0

//! wavefront-core: three executors for an iterative 2-D stencil relaxation.
//!
//! The harness compares a strictly sequential baseline, a phase-parallel
//! executor that runs the anti-diagonal wavefront schedule with dynamic
//! work distribution, and a token engine: per-row actors connected by
//! single-slot boundary channels, scheduled by a ready-queue/worker-pool
//! runtime, where the wavefront dependency structure is carried entirely
//! by decentralized message passing instead of barriers.
//!
//! All three produce bit-identical grids from identical seeded input; the
//! kernel's floating-point operation order is frozen (see [`relax_row`]).
#![forbid(unsafe_code)]

mod actor;
mod channel;
mod engine;
mod exec;
mod grid;
mod probe;
mod runtime;
mod seed;
mod stencil;

/// Actor identity (arena index).
pub use actor::ActorId;
/// Single-slot dependency edge between adjacent row actors.
pub use channel::{BoundaryChannel, ChannelId};
/// Ready queue, worker parking, quiescence detection.
pub use engine::{Dispatch, Engine};
/// Anti-diagonal phase schedule and its executor.
pub use exec::{phase_count, relax_phase_parallel, wave_phase, WavePhase};
/// Owned and shared grid forms.
pub use grid::{Grid, SharedGrid};
/// Protocol instrumentation hooks.
pub use probe::{NullProbe, Probe};
/// Token-engine driver.
pub use runtime::{relax_token_engine, ConfigError};
/// Deterministic seeding.
pub use seed::{seeded_grid, XorShift64, SEED_SPAN};
/// The 4-point relaxation kernel and sequential baseline.
pub use stencil::{relax_row, relax_row_shared, relax_sequential};
