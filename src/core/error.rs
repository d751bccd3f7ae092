//! Gameplay rejections.
//!
//! Every input the simulation refuses comes back as a `Rejection`. A
//! rejection is a normal outcome, not a fault: the call made no change to
//! the simulation and the presentation layer may simply ignore it.
//!
//! Programming-contract violations (playing a card that is not in the
//! acting hand, placing two units on one cell at setup) are not represented
//! here; they panic.

use serde::{Deserialize, Serialize};

use super::entity::UnitId;
use crate::grid::Coord;

/// Why an input was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum Rejection {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Coord),

    #[error("cell {0} is occupied")]
    CellOccupied(Coord),

    #[error("target at {target} is {distance} tiles away, range is {range}")]
    OutOfRange {
        target: Coord,
        distance: u32,
        range: u32,
    },

    #[error("cell {0} is not reachable this move")]
    NotReachable(Coord),

    #[error("no free path to {0}")]
    NoPath(Coord),

    #[error("action is not allowed during the current phase")]
    WrongPhase,

    #[error("no unit is selected")]
    NoSelection,

    #[error("{0} does not belong to the player")]
    NotOwnUnit(UnitId),

    #[error("{0} has already moved this turn")]
    AlreadyMoved(UnitId),

    #[error("{0} has already attacked this turn")]
    AlreadyAttacked(UnitId),

    #[error("click does not match the current card mode")]
    WrongCardMode,

    #[error("cell {0} does not hold an enemy unit")]
    NotAnEnemy(Coord),

    #[error("no free tile within charge range is next to an enemy")]
    NoChargeLanding,

    #[error("an attack is already waiting for a reaction")]
    ReactionPending,

    #[error("no attack is waiting for a reaction")]
    NoReactionPending,

    #[error("only Defend cards can answer an attack")]
    NotDefendCard,

    #[error("equipment slot {slot} does not exist ({filled} filled)")]
    InvalidSlot { slot: usize, filled: usize },

    #[error("a unit is still moving")]
    Busy,

    #[error("{0} is not on the battlefield")]
    UnknownUnit(UnitId),
}
