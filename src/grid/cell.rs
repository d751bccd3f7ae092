//! Grid coordinates and cells.

use serde::{Deserialize, Serialize};

use crate::core::UnitId;

/// Integer grid position. `x` runs along width, `z` along height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub z: i32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Hop distance on the 4-directional grid.
    #[must_use]
    pub const fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// The four orthogonal neighbours: up, down, left, right.
    ///
    /// May lie outside any particular grid; see `Grid::neighbors`.
    #[must_use]
    pub const fn adjacent(self) -> [Coord; 4] {
        [
            Coord::new(self.x, self.z + 1),
            Coord::new(self.x, self.z - 1),
            Coord::new(self.x - 1, self.z),
            Coord::new(self.x + 1, self.z),
        ]
    }

    /// Whether `other` is exactly one orthogonal hop away.
    #[must_use]
    pub const fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// One addressable grid position with its optional occupant.
///
/// The occupant is a back-reference only; units are owned by the
/// battlefield, which keeps `unit.position` and `cell.occupant` in step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: Coord,
    pub(crate) occupant: Option<UnitId>,
}

impl Cell {
    #[must_use]
    pub(crate) const fn empty(coord: Coord) -> Self {
        Self { coord, occupant: None }
    }

    /// The unit standing here, if any.
    #[must_use]
    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}
