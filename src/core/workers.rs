//! Worker identities and positions.
//!
//! Each side owns exactly two workers, indexed 0 and 1. The `WorkerSet`
//! keeps every worker on a distinct in-bounds cell.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::error::{EngineError, Result};
use super::grid::Grid;
use super::side::{Side, SideMap};

/// Workers per side in the base ruleset.
pub const WORKERS_PER_SIDE: u8 = 2;

/// Identity of a worker: owning side plus index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId {
    /// Owning side.
    pub side: Side,
    /// Index within the side (0 or 1).
    pub index: u8,
}

impl WorkerId {
    /// Create a worker ID.
    #[must_use]
    pub const fn new(side: Side, index: u8) -> Self {
        Self { side, index }
    }

    /// Both workers of a side in index order.
    pub fn of(side: Side) -> impl Iterator<Item = WorkerId> {
        (0..WORKERS_PER_SIDE).map(move |i| WorkerId::new(side, i))
    }

    /// All four workers: Blue 0, Blue 1, Red 0, Red 1.
    pub fn all() -> impl Iterator<Item = WorkerId> {
        Side::ALL.into_iter().flat_map(WorkerId::of)
    }

    /// Whether the index refers to an existing worker.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.index < WORKERS_PER_SIDE
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

/// Starting cells per side, worker 0 first.
pub type Placements = SideMap<[Coord; 2]>;

/// Default starting cells for a grid.
///
/// With `lo(n) = n / 4` and `hi(n) = n - 1 - n / 4`, Blue starts on
/// `(lo, lo)` and `(hi, hi)`, Red on `(lo, hi)` and `(hi, lo)`.
///
/// ```
/// use santorini_engine::core::{default_placements, Coord, Side};
///
/// let p = default_placements(5, 5);
/// assert_eq!(p[Side::Blue], [Coord::new(1, 1), Coord::new(3, 3)]);
/// assert_eq!(p[Side::Red], [Coord::new(1, 3), Coord::new(3, 1)]);
/// ```
#[must_use]
pub fn default_placements(rows: u8, cols: u8) -> Placements {
    let lo = |n: u8| n / 4;
    let hi = |n: u8| n.saturating_sub(1).saturating_sub(n / 4);

    SideMap::from_values(
        [Coord::new(lo(rows), lo(cols)), Coord::new(hi(rows), hi(cols))],
        [Coord::new(lo(rows), hi(cols)), Coord::new(hi(rows), lo(cols))],
    )
}

/// Positions of all workers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerSet {
    positions: SideMap<[Coord; 2]>,
}

impl WorkerSet {
    /// Place workers, validating bounds and uniqueness against the grid.
    pub fn place(grid: &Grid, placements: &Placements) -> Result<Self> {
        let mut placed: Vec<(WorkerId, Coord)> = Vec::with_capacity(4);

        for worker in WorkerId::all() {
            let coord = placements[worker.side][worker.index as usize];
            if !grid.contains(coord) {
                return Err(EngineError::OutOfBounds {
                    coord,
                    rows: grid.rows(),
                    cols: grid.cols(),
                });
            }
            if let Some(&(occupant, _)) = placed.iter().find(|(_, c)| *c == coord) {
                return Err(EngineError::CellOccupied { coord, occupant });
            }
            placed.push((worker, coord));
        }

        Ok(Self {
            positions: *placements,
        })
    }

    /// Current cell of a worker.
    #[must_use]
    pub fn position_of(&self, worker: WorkerId) -> Coord {
        self.positions[worker.side][worker.index as usize]
    }

    /// The worker standing on a cell, if any.
    #[must_use]
    pub fn occupant_at(&self, coord: Coord) -> Option<WorkerId> {
        WorkerId::all().find(|w| self.position_of(*w) == coord)
    }

    /// Whether any worker stands on a cell.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.occupant_at(coord).is_some()
    }

    /// Move a worker to a new cell.
    ///
    /// Checked against the current positions, so a cell vacated by an earlier
    /// committed relocate is free. Bounds are the caller's responsibility.
    pub fn relocate(&mut self, worker: WorkerId, coord: Coord) -> Result<()> {
        if let Some(occupant) = self.occupant_at(coord) {
            return Err(EngineError::CellOccupied { coord, occupant });
        }
        self.positions[worker.side][worker.index as usize] = coord;
        Ok(())
    }

    /// Workers of one side with their positions, in index order.
    pub fn workers_of(&self, side: Side) -> impl Iterator<Item = (WorkerId, Coord)> + '_ {
        WorkerId::of(side).map(move |w| (w, self.position_of(w)))
    }

    /// All workers with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (WorkerId, Coord)> + '_ {
        WorkerId::all().map(move |w| (w, self.position_of(w)))
    }

    /// Raw placement view, for snapshots and resets.
    #[must_use]
    pub fn positions(&self) -> &Placements {
        &self.positions
    }
}
