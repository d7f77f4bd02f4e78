// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]
#![allow(clippy::expect_used)]

use wavefront_core::{
    relax_phase_parallel, relax_sequential, relax_token_engine, Grid, NullProbe, Probe,
    SharedGrid,
};

/// Seeds exercised by the invariance matrices.
pub const SEEDS: &[u64] = &[0x1, 0xDEAD_BEEF, 0xA5A5_A5A5_A5A5_A5A5];

/// Worker counts exercised by the invariance matrices.
pub const WORKER_COUNTS: &[usize] = &[1, 2, 3, 4, 8];

/// Runs the sequential baseline on a copy of `seeded`.
pub fn run_sequential(seeded: &Grid, passes: u32) -> Grid {
    let mut grid = seeded.clone();
    relax_sequential(&mut grid, passes);
    grid
}

/// Runs the phase-parallel executor on a copy of `seeded`.
pub fn run_phases(seeded: &Grid, passes: u32, workers: usize) -> Grid {
    let shared = SharedGrid::from_grid(seeded);
    relax_phase_parallel(&shared, passes, workers);
    shared.snapshot()
}

/// Runs the token engine on a copy of `seeded`.
pub fn run_engine(seeded: &Grid, passes: u32, workers: usize) -> Grid {
    run_engine_probed(seeded, passes, workers, &NullProbe)
}

/// Runs the token engine with an instrumentation probe installed.
pub fn run_engine_probed(seeded: &Grid, passes: u32, workers: usize, probe: &dyn Probe) -> Grid {
    let shared = SharedGrid::from_grid(seeded);
    relax_token_engine(&shared, passes, workers, probe).expect("valid configuration");
    shared.snapshot()
}
