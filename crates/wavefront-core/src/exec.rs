// SPDX-License-Identifier: Apache-2.0

//! Phase-parallel wavefront executor.
//!
//! Runs the anti-diagonal schedule explicitly: phase `t` updates the
//! interior rows `i` with `i ≡ t (mod 2)`, `i <= t`, `i > t - 2T`. Rows
//! eligible in the same phase touch disjoint write sets and read only rows
//! not written in that phase, so they may run in any order; a barrier
//! separates phases.
//!
//! Workers persist across phases and dynamically claim eligible rows via an
//! atomic counter (work-stealing). Determinism does not depend on which
//! worker claims which row.

// The window arithmetic runs in i64 so `t - 2T + 1` can go negative;
// bounds are re-checked before converting back.
#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

use crate::grid::SharedGrid;
use crate::stencil::relax_row_shared;

/// One phase of the wavefront schedule: the eligible interior rows are
/// `first_row`, `first_row + 2`, … (`count` of them).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePhase {
    first_row: usize,
    count: usize,
}

impl WavePhase {
    /// Number of eligible rows in this phase.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The `k`-th eligible row, `k < count`.
    #[inline]
    pub fn row(&self, k: usize) -> usize {
        debug_assert!(k < self.count);
        self.first_row + 2 * k
    }
}

/// Total number of phases for a `rows`-high grid and `passes` sweeps:
/// `(2T - 1) + (H - 3)`.
pub fn phase_count(rows: usize, passes: u32) -> usize {
    debug_assert!(rows >= 3 && passes >= 1);
    2 * passes as usize + rows - 4
}

/// Computes the eligible-row window for phase `t` (1-based) arithmetically.
///
/// Window bounds before parity alignment: `max(1, t - 2T + 1) ..= min(t, H-2)`.
pub fn wave_phase(rows: usize, passes: u32, t: usize) -> WavePhase {
    debug_assert!(t >= 1 && t <= phase_count(rows, passes));
    let parity = (t % 2) as i64;
    let min_row = if parity == 1 { 1 } else { 2 };

    let mut lo = (t as i64 - 2 * i64::from(passes) + 1).max(min_row);
    if lo % 2 != parity {
        lo += 1;
    }
    let mut hi = t.min(rows - 2) as i64;
    if hi % 2 != parity {
        hi -= 1;
    }

    if hi < lo {
        WavePhase {
            first_row: 0,
            count: 0,
        }
    } else {
        WavePhase {
            first_row: lo as usize,
            count: ((hi - lo) / 2 + 1) as usize,
        }
    }
}

/// Runs `passes` relaxation sweeps with the phase-parallel executor.
///
/// Bit-identical to [`crate::relax_sequential`] on the same starting grid:
/// within a phase every update reads only rows finalized in earlier phases
/// (or untouched this phase), which reproduces the sequential read/write
/// partial order exactly.
///
/// # Panics
///
/// Panics if `workers == 0` or if any worker thread panics.
pub fn relax_phase_parallel(grid: &SharedGrid, passes: u32, workers: usize) {
    assert!(workers >= 1, "need at least one worker");
    let rows = grid.rows();
    if rows < 3 || grid.cols() < 3 || passes == 0 {
        return;
    }

    // No point spawning more threads than there are interior rows.
    let workers = workers.min(rows - 2);
    let phases = phase_count(rows, passes);
    let claim = AtomicUsize::new(0);
    let barrier = Barrier::new(workers);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let claim = &claim;
                let barrier = &barrier;

                s.spawn(move || {
                    for t in 1..=phases {
                        let phase = wave_phase(rows, passes, t);

                        // Work-stealing loop: claim rows until none remain.
                        // Relaxed suffices; the barrier orders phases.
                        loop {
                            let k = claim.fetch_add(1, Ordering::Relaxed);
                            if k >= phase.count() {
                                break;
                            }
                            relax_row_shared(grid, phase.row(k));
                        }

                        if barrier.wait().is_leader() {
                            claim.store(0, Ordering::Relaxed);
                        }
                        // Second rendezvous: nobody claims from the next
                        // phase until the counter reset is visible.
                        barrier.wait();
                    }
                })
            })
            .collect();

        for h in handles {
            if let Err(e) = h.join() {
                std::panic::resume_unwind(e);
            }
        }
    });
}
