//! Elevation grid.
//!
//! Pure data: a rows × cols map of cells, each holding a level in `0..=3`
//! and a capped (dome) flag. The grid knows nothing about workers or turns.
//!
//! ## Build Rule
//!
//! A build raises a cell by exactly one level. A build on level 3 places a
//! cap instead, leaving the level at 3. A capped cell accepts no further
//! builds.
//!
//! ```
//! use santorini_engine::core::{Coord, Grid};
//!
//! let mut grid = Grid::new(5, 5).unwrap();
//! let cell = Coord::new(1, 3);
//!
//! grid.build(cell).unwrap();
//! assert_eq!(grid.elevation(cell).unwrap(), 1);
//!
//! for _ in 0..3 {
//!     grid.build(cell).unwrap();
//! }
//! assert_eq!(grid.elevation(cell).unwrap(), 3);
//! assert!(grid.is_capped(cell).unwrap());
//! assert!(grid.build(cell).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::error::{EngineError, Result};

/// Highest buildable level. Moving onto it wins the game.
pub const MAX_LEVEL: u8 = 3;

/// Smallest supported grid extent.
pub const MIN_EXTENT: u8 = 2;

/// Largest supported grid extent.
pub const MAX_EXTENT: u8 = 16;

/// A single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Elevation in `0..=MAX_LEVEL`.
    pub level: u8,
    /// Dome placed on top of level 3.
    pub capped: bool,
}

/// Fixed-size rectangular elevation map, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: u8,
    cols: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell at level 0.
    pub fn new(rows: u8, cols: u8) -> Result<Self> {
        let valid = MIN_EXTENT..=MAX_EXTENT;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows as usize * cols as usize],
        })
    }

    /// Create a grid from nested rows of levels, where `4` stands for a
    /// capped level-3 cell.
    ///
    /// Rows must all have the same length.
    pub fn from_levels(levels: &[Vec<u8>]) -> Result<Self> {
        let rows = u8::try_from(levels.len()).unwrap_or(u8::MAX);
        let cols = levels
            .first()
            .map_or(0, |r| u8::try_from(r.len()).unwrap_or(u8::MAX));
        let mut grid = Self::new(rows, cols)?;

        if levels.iter().any(|r| r.len() != cols as usize) {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }

        for (cell, &level) in grid.cells.iter_mut().zip(levels.iter().flatten()) {
            *cell = Cell {
                level: level.min(MAX_LEVEL),
                capped: level > MAX_LEVEL,
            };
        }

        Ok(grid)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Check whether a coordinate lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    #[inline]
    fn index_of(&self, coord: Coord) -> Result<usize> {
        if self.contains(coord) {
            Ok(coord.row as usize * self.cols as usize + coord.col as usize)
        } else {
            Err(EngineError::OutOfBounds {
                coord,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Get a cell.
    pub fn cell(&self, coord: Coord) -> Result<Cell> {
        self.index_of(coord).map(|i| self.cells[i])
    }

    /// Elevation of a cell.
    pub fn elevation(&self, coord: Coord) -> Result<u8> {
        self.cell(coord).map(|c| c.level)
    }

    /// Whether a cell carries a dome.
    pub fn is_capped(&self, coord: Coord) -> Result<bool> {
        self.cell(coord).map(|c| c.capped)
    }

    /// Build on a cell: +1 level, or a cap on level 3.
    ///
    /// Returns the cell after the build.
    pub fn build(&mut self, coord: Coord) -> Result<Cell> {
        let idx = self.index_of(coord)?;
        let cell = &mut self.cells[idx];

        if cell.capped {
            return Err(EngineError::AlreadyCapped { coord });
        }

        if cell.level < MAX_LEVEL {
            cell.level += 1;
        } else {
            cell.capped = true;
        }

        Ok(*cell)
    }

    /// In-bounds Moore neighbours in enumeration order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord.moore().filter(move |c| self.contains(*c))
    }

    /// Iterate over all coordinates row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
    }

    /// Levels as nested rows, for rendering.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|c| c.level).collect())
            .collect()
    }

    /// Cap flags as nested rows, for rendering.
    #[must_use]
    pub fn caps(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|c| c.capped).collect())
            .collect()
    }
}
