//! Committed gameplay actions and their history records.
//!
//! Every action the simulation commits (a move, a card play, an attack)
//! is appended to the history as an `ActionRecord`. Rejected inputs are
//! never recorded.

use serde::{Deserialize, Serialize};

use super::entity::{CardId, UnitId};
use super::team::Team;
use crate::cards::CardKind;
use crate::grid::Coord;

/// A committed action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// A card left a hand and took effect.
    PlayCard {
        unit: UnitId,
        card: CardId,
        kind: CardKind,
    },
    /// A unit started moving along a path.
    Move { unit: UnitId, from: Coord, to: Coord },
    /// An attack was handed to the reaction protocol.
    Attack {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
    },
    /// The strike half of a Charge.
    ChargeStrike {
        unit: UnitId,
        target: UnitId,
        damage: i32,
    },
    /// A Protection Gem blocked an attack on its own.
    AutoDefend { unit: UnitId },
    /// An equipment card went into a slot.
    Equip {
        unit: UnitId,
        card: CardId,
        slot: usize,
    },
    EndTurn,
}

impl Action {
    /// The card kind, for card plays.
    #[must_use]
    pub fn played_card(&self) -> Option<(UnitId, CardKind)> {
        match *self {
            Action::PlayCard { unit, kind, .. } => Some((unit, kind)),
            _ => None,
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that acted.
    pub team: Team,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(team: Team, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            team,
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_played_card() {
        let play = Action::PlayCard {
            unit: UnitId::new(1),
            card: CardId::new(4),
            kind: CardKind::Medicine,
        };
        assert_eq!(play.played_card(), Some((UnitId::new(1), CardKind::Medicine)));
        assert_eq!(Action::EndTurn.played_card(), None);
    }

    #[test]
    fn test_record_serialization() {
        let record = ActionRecord::new(
            Team::Enemy,
            Action::Move {
                unit: UnitId::new(2),
                from: Coord::new(0, 0),
                to: Coord::new(0, 3),
            },
            3,
            1,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
