//! Tile-by-tile movement.
//!
//! A `Movement` owns the remaining path of one unit. Each `tick` spends
//! elapsed time on hops; every hop is a single `occupy` transaction, so the
//! grid never shows the unit on two cells. The unit counts as moving (and
//! cannot be moved again) until the last hop lands.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::core::{GameState, SimEvent, UnitId};
use crate::grid::Coord;

/// Why the unit is moving, which decides what happens on arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePurpose {
    Plain,
    /// The player's Charge move, followed by target selection.
    PlayerCharge,
    /// An enemy Charge move, followed by the scripted strike.
    EnemyCharge,
}

/// Progress of a movement after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveProgress {
    InProgress,
    /// Arrived at the final tile.
    Arrived,
    /// A hop was refused; the unit stopped where it was.
    Interrupted,
}

/// A unit walking along a path.
#[derive(Clone, Debug)]
pub struct Movement {
    unit: UnitId,
    path: VecDeque<Coord>,
    step_seconds: f32,
    elapsed: f32,
    purpose: MovePurpose,
}

impl Movement {
    /// Start walking `path`, which begins at the unit's current cell.
    ///
    /// Marks the unit as moving.
    ///
    /// # Panics
    ///
    /// If the unit is not on the battlefield.
    pub fn start(state: &mut GameState, unit: UnitId, path: Vec<Coord>, purpose: MovePurpose) -> Self {
        let mover = state
            .battlefield
            .unit_mut(unit)
            .unwrap_or_else(|| panic!("{} cannot move: not on the battlefield", unit));
        mover.flags.is_moving = true;

        let mut path: VecDeque<Coord> = path.into();
        if path.front() == Some(&mover.position()) {
            path.pop_front();
        }
        debug!(%unit, hops = path.len(), ?purpose, "movement started");

        Self {
            unit,
            path,
            step_seconds: state.config.move_step_seconds,
            elapsed: 0.0,
            purpose,
        }
    }

    #[must_use]
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    #[must_use]
    pub fn purpose(&self) -> MovePurpose {
        self.purpose
    }

    /// Hops left to walk.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    /// Spend `dt` seconds. A zero step length walks the whole path at once.
    pub fn tick(&mut self, state: &mut GameState, dt: f32) -> MoveProgress {
        self.elapsed += dt;

        while let Some(&next) = self.path.front() {
            if self.step_seconds > 0.0 {
                if self.elapsed < self.step_seconds {
                    return MoveProgress::InProgress;
                }
                self.elapsed -= self.step_seconds;
            }

            match state.battlefield.occupy(self.unit, next) {
                Ok(from) => {
                    self.path.pop_front();
                    state.emit(SimEvent::UnitMoved {
                        unit: self.unit,
                        from,
                        to: next,
                    });
                }
                Err(rejection) => {
                    warn!(unit = %self.unit, %rejection, "movement interrupted");
                    self.path.clear();
                    self.finish(state);
                    return MoveProgress::Interrupted;
                }
            }
        }

        self.finish(state);
        MoveProgress::Arrived
    }

    fn finish(&self, state: &mut GameState) {
        if let Some(unit) = state.battlefield.unit_mut(self.unit) {
            unit.flags.is_moving = false;
            unit.flags.has_moved = true;
            debug!(unit = %self.unit, at = %unit.position(), "movement finished");
        }
    }
}
