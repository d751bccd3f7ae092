//! Fixed-size grid of cells.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cell::{Cell, Coord};
use crate::core::UnitId;

/// Rectangular grid, `width` × `height`, fixed at construction.
///
/// Occupancy can only be changed from inside the crate; outside callers go
/// through `Battlefield`, which updates the unit's position in the same
/// step.
///
/// ```
/// use dino_tactics::grid::{Coord, Grid};
///
/// let grid = Grid::new(4, 3);
/// assert!(grid.contains(Coord::new(3, 2)));
/// assert!(!grid.contains(Coord::new(4, 0)));
/// assert_eq!(grid.neighbors(Coord::new(0, 0)).len(), 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major by z, then x.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Grid must be at least 1x1");

        let cells = (0..height)
            .flat_map(|z| (0..width).map(move |x| Cell::empty(Coord::new(x, z))))
            .collect();

        Self { width, height, cells }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether the coordinate lies on the grid.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.z)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.z * self.width + coord.x) as usize)
    }

    /// The cell at `coord`, or `None` off the grid.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    /// The unit standing at `coord`.
    #[must_use]
    pub fn occupant(&self, coord: Coord) -> Option<UnitId> {
        self.cell(coord).and_then(Cell::occupant)
    }

    /// On the grid and unoccupied.
    #[must_use]
    pub fn is_free(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|c| !c.is_occupied())
    }

    /// In-bounds orthogonal neighbours, in up, down, left, right order.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> SmallVec<[Coord; 4]> {
        coord
            .adjacent()
            .into_iter()
            .filter(|&c| self.contains(c))
            .collect()
    }

    /// Iterate over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Write a cell's occupant. Only the battlefield's occupy transaction
    /// may call this.
    pub(crate) fn set_occupant(&mut self, coord: Coord, occupant: Option<UnitId>) {
        let index = self
            .index(coord)
            .unwrap_or_else(|| panic!("Cell {} is outside the grid", coord));
        self.cells[index].occupant = occupant;
    }
}
