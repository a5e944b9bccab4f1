//! Board coordinates and the fixed neighbourhood order.
//!
//! ## Enumeration Order
//!
//! Every legality query walks the 8 Moore neighbours of a cell in the same
//! row-major order of relative offsets, `(0,0)` excluded:
//!
//! ```text
//! (-1,-1) (-1,0) (-1,1)
//! ( 0,-1)        ( 0,1)
//! ( 1,-1) ( 1,0) ( 1,1)
//! ```
//!
//! Legality never depends on this order. Bots rely on it to break ties
//! deterministically.
//!
//! ```
//! use santorini_engine::core::Coord;
//!
//! let centre = Coord::new(2, 2);
//! let first = centre.offset(-1, -1);
//! assert_eq!(first, Some(Coord::new(1, 1)));
//!
//! // Negative coordinates are not representable
//! assert_eq!(Coord::new(0, 0).offset(-1, 0), None);
//! ```

use serde::{Deserialize, Serialize};

/// Relative offsets of the Moore neighbourhood in enumeration order.
pub const MOORE_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell position on the grid, 0-based from the top-left corner.
///
/// Serialized as `{ "row": r, "col": c }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index.
    pub row: u8,
    /// Column index.
    pub col: u8,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Shift by a relative offset.
    ///
    /// Returns `None` when the result would be negative or overflow `u8`.
    /// Upper grid bounds are checked by the grid, not here.
    #[must_use]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Coord> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Coord { row, col })
    }

    /// Moore-neighbour candidates in enumeration order, without bounds
    /// filtering beyond non-negativity.
    pub fn moore(self) -> impl Iterator<Item = Coord> {
        MOORE_OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// Chebyshev (king-move) distance.
    #[must_use]
    pub fn chebyshev(self, other: Coord) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Check whether two distinct cells touch (including diagonally).
    #[must_use]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.chebyshev(other) == 1
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(u8, u8)> for Coord {
    fn from((row, col): (u8, u8)) -> Self {
        Self { row, col }
    }
}
