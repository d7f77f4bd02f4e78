// SPDX-License-Identifier: Apache-2.0

//! The 4-point relaxation kernel and the sequential baseline.
//!
//! The operand order is frozen: `(left + right + up + down) * 0.25`, swept
//! in place from low to high column. Every lane must evaluate exactly this
//! expression in exactly this order: bit-identical output across lanes is
//! part of the harness contract, and any reassociation breaks it.
//!
//! The in-place sweep means the `left` operand is the value already updated
//! in the current pass (Gauss–Seidel along the row), while `right` is the
//! previous value.

use crate::grid::{Grid, SharedGrid};

/// Relaxes one interior row of an owned grid in place.
#[inline]
pub fn relax_row(grid: &mut Grid, row: usize) {
    for col in 1..grid.cols() - 1 {
        let v = (grid.get(row, col - 1)
            + grid.get(row, col + 1)
            + grid.get(row - 1, col)
            + grid.get(row + 1, col))
            * 0.25;
        grid.set(row, col, v);
    }
}

/// Relaxes one interior row of a shared grid in place.
///
/// Caller must hold exclusive write access to `row` (one writer per row)
/// and must be ordered after the neighbor rows' relevant writes by the
/// scheduling protocol.
#[inline]
pub fn relax_row_shared(grid: &SharedGrid, row: usize) {
    for col in 1..grid.cols() - 1 {
        let v = (grid.load(row, col - 1)
            + grid.load(row, col + 1)
            + grid.load(row - 1, col)
            + grid.load(row + 1, col))
            * 0.25;
        grid.store(row, col, v);
    }
}

/// Sequential baseline: `passes` top-to-bottom sweeps over the interior.
///
/// This is the reference every parallel lane is compared against.
pub fn relax_sequential(grid: &mut Grid, passes: u32) {
    let rows = grid.rows();
    for _ in 0..passes {
        for row in 1..rows.saturating_sub(1) {
            relax_row(grid, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_average() {
        // 3x3: the one interior cell averages its four neighbors.
        let mut g = Grid::zeroed(3, 3);
        g.set(1, 0, 1.0);
        g.set(1, 2, 2.0);
        g.set(0, 1, 3.0);
        g.set(2, 1, 4.0);

        relax_row(&mut g, 1);
        assert_eq!(g.get(1, 1).to_bits(), 2.5_f64.to_bits());
    }

    #[test]
    fn sweep_uses_updated_left_neighbor() {
        // 3x4 with two interior cells in the row: the second update must
        // read the first one's fresh value, not the stale one.
        let mut g = Grid::zeroed(3, 4);
        g.set(1, 0, 4.0);

        relax_row(&mut g, 1);
        let first: f64 = (4.0 + 0.0 + 0.0 + 0.0) * 0.25; // 1.0
        let second: f64 = (first + 0.0 + 0.0 + 0.0) * 0.25; // 0.25
        assert_eq!(g.get(1, 1).to_bits(), first.to_bits());
        assert_eq!(g.get(1, 2).to_bits(), second.to_bits());
    }

    #[test]
    fn shared_kernel_matches_owned_kernel() {
        let owned = crate::seed::seeded_grid(6, 9, 77);
        let shared = SharedGrid::from_grid(&owned);

        let mut a = owned.clone();
        for row in 1..5 {
            relax_row(&mut a, row);
            relax_row_shared(&shared, row);
        }
        assert!(a.bit_eq(&shared.snapshot()));
    }

    #[test]
    fn degenerate_grids_are_noops() {
        let mut tiny = Grid::zeroed(2, 2);
        relax_sequential(&mut tiny, 3);
        assert!(tiny.bit_eq(&Grid::zeroed(2, 2)));
    }
}
