//! Fixed-size pixel grid with a permanent dead border.
//!
//! Dimensions are fixed at construction; cells in row 0, row H-1, column 0
//! or column W-1 are dead in every generation. Only interior cells evolve.

use thiserror::Error;

use super::cell::{Cell, DEAD};

/// Smallest legal edge: one interior cell plus the dead frontier.
pub const MIN_DIM: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions {width}x{height} too small (minimum {MIN_DIM}x{MIN_DIM})")]
    DimensionsTooSmall { width: usize, height: usize },
    #[error("buffer dimensions {0}x{1} and {2}x{3} differ")]
    ArenaMismatch(usize, usize, usize, usize),
}

/// Row-major buffer of pixel cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an all-dead grid. Allocation happens once per buffer at
    /// startup; stepping never reallocates.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width < MIN_DIM || height < MIN_DIM {
            return Err(GridError::DimensionsTooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![DEAD; width * height],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells subject to the survival rule.
    #[inline]
    pub fn interior_cell_count(&self) -> usize {
        (self.width - 2) * (self.height - 2)
    }

    #[inline]
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row == self.height - 1 || col == self.width - 1
    }

    /// Flattened index of (row, col).
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Set one cell. Border positions are forced dead, keeping the frontier
    /// invariant unconditional.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let cell = if self.is_border(row, col) {
            DEAD
        } else {
            Cell::from_alive(alive)
        };
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows 1..height-1 as one mutable span, for the stepper and seeder to
    /// split into per-row chunks. Columns 0 and width-1 inside the span are
    /// never written by either.
    pub(crate) fn interior_span_mut(&mut self) -> &mut [Cell] {
        let width = self.width;
        let end = width * (self.height - 1);
        &mut self.cells[width..end]
    }

    /// Raw channel bytes in row-major pixel order, ready for direct upload
    /// to a display surface.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framelife::cell::CHANNELS;

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            Grid::new(2, 8),
            Err(GridError::DimensionsTooSmall { width: 2, height: 8 })
        ));
        assert!(Grid::new(8, 0).is_err());
        assert!(Grid::new(3, 3).is_ok());
    }

    #[test]
    fn starts_all_dead() {
        let grid = Grid::new(5, 4).unwrap();
        assert_eq!(grid.count_alive(), 0);
        assert_eq!(grid.cells().len(), 20);
    }

    #[test]
    fn set_on_border_stays_dead() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(0, 2, true);
        grid.set(4, 0, true);
        grid.set(2, 4, true);
        assert_eq!(grid.count_alive(), 0);

        grid.set(2, 2, true);
        assert!(grid.get(2, 2).is_alive());
        assert_eq!(grid.count_alive(), 1);
    }

    #[test]
    fn interior_span_covers_rows_one_to_last() {
        let mut grid = Grid::new(4, 5).unwrap();
        let width = grid.width();
        let span = grid.interior_span_mut();
        assert_eq!(span.len(), width * 3);
    }

    #[test]
    fn byte_view_matches_cell_layout() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(1, 1, true);
        let bytes = grid.as_bytes();
        assert_eq!(bytes.len(), 9 * CHANNELS);
        let center = grid.index(1, 1) * CHANNELS;
        assert!(bytes[center..center + CHANNELS].iter().all(|&b| b == u8::MAX));
        assert!(bytes[..center].iter().all(|&b| b == 0));
    }
}
