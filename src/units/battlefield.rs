//! Grid plus the units standing on it.
//!
//! `Battlefield` owns every live unit and keeps the two halves of the
//! position relation in step: `unit.position` and the cell's occupant are
//! only ever written together, by `spawn`, `occupy` and `remove`.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::unit::{Unit, UnitSpec};
use crate::core::{Rejection, Team, TeamMap, UnitId};
use crate::grid::{Coord, Grid};

/// Live units, their rosters and the grid they stand on.
#[derive(Clone, Debug)]
pub struct Battlefield {
    grid: Grid,
    units: BTreeMap<UnitId, Unit>,
    rosters: TeamMap<Vec<UnitId>>,
    next_id: u32,
}

impl Battlefield {
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            units: BTreeMap::new(),
            rosters: TeamMap::with_default(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Place a new unit and add it to the end of its team's roster.
    ///
    /// # Panics
    ///
    /// If `position` is off the grid or already occupied.
    pub fn spawn(&mut self, spec: UnitSpec, position: Coord) -> UnitId {
        assert!(self.grid.contains(position), "Cannot spawn at {}: outside the grid", position);
        assert!(self.grid.is_free(position), "Cannot spawn at {}: cell is occupied", position);

        let id = UnitId::new(self.next_id);
        self.next_id += 1;

        let unit = Unit::new(id, spec, position);
        info!(%id, name = %unit.name, team = %unit.team, %position, "unit spawned");

        self.grid.set_occupant(position, Some(id));
        self.rosters[unit.team].push(id);
        self.units.insert(id, unit);
        id
    }

    /// Move a unit to `to`, rewriting both cells and the unit's position in
    /// one step. Returns the cell it left.
    pub fn occupy(&mut self, id: UnitId, to: Coord) -> Result<Coord, Rejection> {
        if !self.grid.contains(to) {
            return Err(Rejection::OutOfBounds(to));
        }
        if !self.grid.is_free(to) {
            return Err(Rejection::CellOccupied(to));
        }
        let unit = self.units.get_mut(&id).ok_or(Rejection::UnknownUnit(id))?;

        let from = unit.position;
        unit.position = to;
        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(id));
        debug!(%id, %from, %to, "unit stepped");
        Ok(from)
    }

    /// Take a unit off the grid and out of its roster.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        self.grid.set_occupant(unit.position, None);
        self.rosters[unit.team].retain(|&u| u != id);
        Some(unit)
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// The unit standing at `coord`.
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.grid.occupant(coord).and_then(|id| self.units.get(&id))
    }

    /// Live units of a team, in spawn order.
    #[must_use]
    pub fn roster(&self, team: Team) -> &[UnitId] {
        &self.rosters[team]
    }

    #[must_use]
    pub fn is_roster_empty(&self, team: Team) -> bool {
        self.rosters[team].is_empty()
    }

    /// All live units.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Reset per-turn flags for every unit of `team`.
    pub fn reset_team(&mut self, team: Team) {
        for unit in self.units.values_mut().filter(|u| u.team == team) {
            unit.reset_turn();
        }
    }

    /// Positions of every unit on `team`.
    #[must_use]
    pub fn positions_of(&self, team: Team) -> Vec<Coord> {
        self.rosters[team]
            .iter()
            .filter_map(|id| self.units.get(id))
            .map(Unit::position)
            .collect()
    }

    /// Closest unit of the opposing team by Manhattan distance. Ties go to
    /// the earlier roster entry.
    #[must_use]
    pub fn nearest_opponent(&self, id: UnitId) -> Option<UnitId> {
        let unit = self.units.get(&id)?;
        self.rosters[unit.team.opponent()]
            .iter()
            .filter_map(|other| self.units.get(other))
            .min_by_key(|other| unit.distance_to(other.position))
            .map(|other| other.id)
    }
}
