//! Generation stepping kernel (B3/S23).
//!
//! Reads only the previous-generation buffer and writes only the working
//! buffer, so rows need no synchronization between them: the rayon pool
//! splits the working grid's interior into disjoint row slices zipped with
//! the matching offset-table rows.

use rayon::prelude::*;

use super::cell::{ALIVE_CHANNEL, Cell};
use super::grid::Grid;
use super::offsets::{OffsetRecord, OffsetTable};

/// Alive/dead totals for one completed generation. Always sums to the
/// interior cell count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTally {
    pub alive: u64,
    pub dead: u64,
}

impl StepTally {
    #[inline]
    fn merge(self, other: Self) -> Self {
        Self {
            alive: self.alive + other.alive,
            dead: self.dead + other.dead,
        }
    }
}

/// Live neighbors of one interior cell, summed branch-free over the three
/// precomputed row triples. The center itself is excluded.
#[inline]
pub fn live_neighbors(prev: &[Cell], rec: &OffsetRecord) -> u32 {
    let sum = prev[rec.above].channel()
        + prev[rec.above + 1].channel()
        + prev[rec.above + 2].channel()
        + prev[rec.row].channel()
        + prev[rec.row + 2].channel()
        + prev[rec.below].channel()
        + prev[rec.below + 1].channel()
        + prev[rec.below + 2].channel();
    sum / ALIVE_CHANNEL as u32
}

/// The survival rule: birth at 3 neighbors, survival at 2 or 3, death
/// otherwise.
#[inline]
pub fn next_state(center: Cell, live_neighbors: u32) -> Cell {
    let alive = if center.is_alive() {
        live_neighbors == 2 || live_neighbors == 3
    } else {
        live_neighbors == 3
    };
    Cell::from_alive(alive)
}

/// Advance one full generation from `prev` into `next`.
///
/// Runs on the ambient rayon pool; call inside `ThreadPool::install` to pin
/// the worker count. Border rows and columns of `next` are never written and
/// stay dead.
pub fn step_generation(prev: &Grid, next: &mut Grid, table: &OffsetTable) -> StepTally {
    debug_assert_eq!(prev.width(), table.width());
    debug_assert_eq!(prev.height(), table.height());
    debug_assert_eq!(prev.width(), next.width());
    debug_assert_eq!(prev.height(), next.height());

    let width = prev.width();
    let cells = prev.cells();

    next.interior_span_mut()
        .par_chunks_mut(width)
        .zip(table.rows().par_iter())
        .map(|(row_out, records)| {
            let mut tally = StepTally::default();
            for (rec, out) in records.iter().zip(&mut row_out[1..width - 1]) {
                let cell = next_state(cells[rec.center], live_neighbors(cells, rec));
                if cell.is_alive() {
                    tally.alive += 1;
                } else {
                    tally.dead += 1;
                }
                *out = cell;
            }
            tally
        })
        .reduce(StepTally::default, StepTally::merge)
}
