// SPDX-License-Identifier: Apache-2.0
//! Wavefront trial harness.
//!
//! Runs repeated trials of the three relaxation lanes on an identically
//! seeded grid, verifies each parallel lane bit-for-bit against the
//! sequential baseline, and reports min/mid/max wall-clock seconds per
//! lane. A mismatch is reported and the harness proceeds to the next
//! trial; only the final summary carries the verdict.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use comfy_table::Table;
use wavefront_core::{
    relax_phase_parallel, relax_sequential, relax_token_engine, seeded_grid, Grid, NullProbe,
    SharedGrid,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Grid height (rows), including the fixed border.
    #[clap(long, default_value_t = 1500)]
    rows: usize,

    /// Grid width (columns), including the fixed border.
    #[clap(long, default_value_t = 3000)]
    cols: usize,

    /// Number of relaxation passes (T).
    #[clap(long, default_value_t = 3000)]
    passes: u32,

    /// Worker threads for the parallel lanes; 0 means hardware concurrency.
    #[clap(long, default_value_t = 0)]
    workers: usize,

    /// Number of timed trials per lane.
    #[clap(long, default_value_t = 19)]
    trials: u32,

    /// Seed for the deterministic grid fill.
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

/// Per-lane timing accumulator with an equality verdict.
struct Lane {
    name: &'static str,
    secs: Vec<f64>,
    all_matched: bool,
}

impl Lane {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            secs: Vec::new(),
            all_matched: true,
        }
    }

    /// min / mid / max, where mid is the midrange `(min + max) / 2`,
    /// the statistic the harness has always reported.
    fn summary(&self) -> (f64, f64, f64) {
        let min = self.secs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.secs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, (min + max) / 2.0, max)
    }
}

fn run_sequential_lane(seeded: &Grid, passes: u32, lane: &mut Lane) -> Grid {
    let mut grid = seeded.clone();
    let start = Instant::now();
    relax_sequential(&mut grid, passes);
    lane.secs.push(start.elapsed().as_secs_f64());
    grid
}

fn run_phase_lane(seeded: &Grid, baseline: &Grid, passes: u32, workers: usize, lane: &mut Lane) {
    let shared = SharedGrid::from_grid(seeded);
    let start = Instant::now();
    relax_phase_parallel(&shared, passes, workers);
    lane.secs.push(start.elapsed().as_secs_f64());
    if !baseline.bit_eq(&shared.snapshot()) {
        println!("warning: {} lane diverged from the baseline", lane.name);
        lane.all_matched = false;
    }
}

fn run_engine_lane(
    seeded: &Grid,
    baseline: &Grid,
    passes: u32,
    workers: usize,
    lane: &mut Lane,
) -> Result<()> {
    let shared = SharedGrid::from_grid(seeded);
    let start = Instant::now();
    relax_token_engine(&shared, passes, workers, &NullProbe)?;
    lane.secs.push(start.elapsed().as_secs_f64());
    if !baseline.bit_eq(&shared.snapshot()) {
        println!("warning: {} lane diverged from the baseline", lane.name);
        lane.all_matched = false;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let workers = if args.workers == 0 {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    } else {
        args.workers
    };

    println!(
        "grid {}x{}, {} passes, {} workers, {} trials",
        args.rows, args.cols, args.passes, workers, args.trials
    );

    let mut sequential = Lane::new("sequential");
    let mut phases = Lane::new("phase-parallel");
    let mut engine = Lane::new("token-engine");

    for trial in 1..=args.trials {
        let seeded = seeded_grid(args.rows, args.cols, args.seed);

        let baseline = run_sequential_lane(&seeded, args.passes, &mut sequential);
        run_phase_lane(&seeded, &baseline, args.passes, workers, &mut phases);
        run_engine_lane(&seeded, &baseline, args.passes, workers, &mut engine)?;

        println!("{}% done", trial * 100 / args.trials);
    }

    let mut table = Table::new();
    table.set_header(vec!["lane", "min (s)", "mid (s)", "max (s)", "verdict"]);
    for lane in [&sequential, &phases, &engine] {
        let (min, mid, max) = lane.summary();
        let verdict = if lane.all_matched { "ok" } else { "MISMATCH" };
        table.add_row(vec![
            lane.name.to_string(),
            format!("{min:.4}"),
            format!("{mid:.4}"),
            format!("{max:.4}"),
            verdict.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
