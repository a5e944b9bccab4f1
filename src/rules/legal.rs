//! Ordered legal-cell sets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Coord;

/// Legal destinations or build cells for one worker.
///
/// Holds at most the 8 Moore neighbours, kept in enumeration order, so it
/// never touches the heap. Lookup is a scan of at most 8 entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalSet {
    cells: SmallVec<[Coord; 8]>,
}

impl LegalSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Number of legal cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if there is no legal cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// Cells as a slice in enumeration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Coord] {
        &self.cells
    }
}

impl FromIterator<Coord> for LegalSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LegalSet {
    type Item = Coord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Coord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}
