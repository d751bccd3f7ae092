//! Grid topology and search.
//!
//! - `Coord` / `Cell`: positions and their optional occupant
//! - `Grid`: fixed rectangular array of cells
//! - `search`: reachable-tile flood fill and A* shortest path

pub mod cell;
pub mod map;
pub mod search;

pub use cell::{Cell, Coord};
pub use map::Grid;
pub use search::{find_path, landing_tiles, reachable_tiles};
