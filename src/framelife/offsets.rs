//! Precomputed neighbor offsets.
//!
//! One record per interior cell: flattened indices of the first cell of each
//! neighbor row triple plus the center itself. Built once per dimension pair
//! and reused every generation, replacing per-cell row/column arithmetic
//! with plain index fetches.

use rayon::prelude::*;

use super::grid::Grid;

/// Flattened indices for one interior cell's neighborhood.
///
/// `above`, `row` and `below` each point at column `col - 1` of the
/// respective row, the first of a contiguous three-cell fetch. `center` is
/// the cell's own index, which is also the write position in the working
/// grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetRecord {
    pub above: usize,
    pub row: usize,
    pub below: usize,
    pub center: usize,
}

/// Offset records for every interior cell, grouped by grid row.
///
/// Immutable after construction and valid only for the width/height pair it
/// was built against.
pub struct OffsetTable {
    width: usize,
    height: usize,
    rows: Vec<Vec<OffsetRecord>>,
}

impl OffsetTable {
    /// Build the table for a grid's dimensions. Each row's records are
    /// independent, so construction runs across rows in parallel.
    pub fn build(grid: &Grid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let rows = (1..height - 1)
            .into_par_iter()
            .map(|row| {
                (1..width - 1)
                    .map(|col| OffsetRecord {
                        above: (row - 1) * width + (col - 1),
                        row: row * width + (col - 1),
                        below: (row + 1) * width + (col - 1),
                        center: row * width + col,
                    })
                    .collect()
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Records for one interior grid row (the first interior row is 1).
    #[inline]
    pub fn row(&self, row: usize) -> &[OffsetRecord] {
        &self.rows[row - 1]
    }

    /// All interior rows in grid order.
    #[inline]
    pub fn rows(&self) -> &[Vec<OffsetRecord>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_interior_only() {
        let grid = Grid::new(6, 5).unwrap();
        let table = OffsetTable::build(&grid);
        assert_eq!(table.rows().len(), 3);
        for row in table.rows() {
            assert_eq!(row.len(), 4);
        }
    }

    #[test]
    fn record_indices_match_row_arithmetic() {
        let grid = Grid::new(7, 6).unwrap();
        let table = OffsetTable::build(&grid);
        let rec = table.row(3)[1]; // grid cell (3, 2)
        assert_eq!(rec.above, grid.index(2, 1));
        assert_eq!(rec.row, grid.index(3, 1));
        assert_eq!(rec.below, grid.index(4, 1));
        assert_eq!(rec.center, grid.index(3, 2));
    }

    #[test]
    fn center_sits_between_side_neighbors() {
        let grid = Grid::new(9, 9).unwrap();
        let table = OffsetTable::build(&grid);
        for row in table.rows() {
            for rec in row {
                assert_eq!(rec.center, rec.row + 1);
                assert_eq!(rec.below - rec.above, 2 * grid.width());
            }
        }
    }
}
