// SPDX-License-Identifier: Apache-2.0

//! Dense 2-D relaxation grids.
//!
//! [`Grid`] is the owned form used by the sequential baseline and for
//! equality comparison. [`SharedGrid`] is the concurrently written form:
//! one `AtomicU64` per cell holding an `f64` bit pattern.
//!
//! Per-cell accesses on `SharedGrid` are `Relaxed`. Cross-thread visibility
//! of a finished row comes from the synchronization edges of the scheduling
//! protocol (engine mutex/condvar, channel release/acquire transitions),
//! never from a grid-level lock. Row-write ownership is structural: exactly
//! one actor (or one claimed phase slot) writes a given row.

use std::sync::atomic::{AtomicU64, Ordering};

/// Owned dense row-major grid of `f64` cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Creates a `rows x cols` grid with every cell set to zero.
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Reads the cell at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[self.idx(row, col)]
    }

    /// Writes the cell at (`row`, `col`).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.idx(row, col);
        self.cells[i] = value;
    }

    /// Bit-for-bit equality over every cell.
    ///
    /// Stricter than `PartialEq`: `-0.0` and `0.0` differ, and NaN payloads
    /// compare by representation. This is the comparison the harness uses to
    /// check a parallel lane against the sequential baseline.
    pub fn bit_eq(&self, other: &Grid) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Shared dense grid of `f64` bit patterns in `AtomicU64` cells.
///
/// Safe for disjoint-row concurrent writes without a lock. The `Relaxed`
/// orderings are sound only because every cross-row read is ordered after
/// the corresponding row's writes by the token protocol (or by a phase
/// barrier); the grid itself provides no ordering.
#[derive(Debug)]
pub struct SharedGrid {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU64>,
}

impl SharedGrid {
    /// Copies an owned grid into shared form.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows,
            cols: grid.cols,
            cells: grid
                .cells
                .iter()
                .map(|v| AtomicU64::new(v.to_bits()))
                .collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Reads the cell at (`row`, `col`).
    #[inline]
    pub fn load(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[self.idx(row, col)].load(Ordering::Relaxed))
    }

    /// Writes the cell at (`row`, `col`).
    #[inline]
    pub fn store(&self, row: usize, col: usize, value: f64) {
        self.cells[self.idx(row, col)].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Copies the current contents back into an owned grid.
    pub fn snapshot(&self) -> Grid {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .map(|c| f64::from_bits(c.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}
