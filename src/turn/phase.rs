//! Turn phases and the player's card mode.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, UnitId};
use crate::grid::Coord;

/// Top-level phase of a skirmish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the game to start.
    #[default]
    Setup,
    PlayerTurn,
    EnemyTurn,
    /// Set by the caller once a roster is empty.
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "Setup",
            Phase::PlayerTurn => "Player Turn",
            Phase::EnemyTurn => "Enemy Turn",
            Phase::GameOver => "Game Over",
        };
        f.write_str(name)
    }
}

/// What the next cell click means for the selected unit.
///
/// Cards that need a target stay in hand until the target is chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CardMode {
    /// Clicks select units or move the selected one.
    #[default]
    None,
    /// Waiting for an enemy in range.
    Attack { card: CardId },
    /// Waiting for a Charge landing tile.
    ChargeMove { card: CardId, landings: FxHashSet<Coord> },
    /// Charge move done, waiting for an adjacent enemy.
    ChargeStrike { targets: Vec<UnitId> },
    /// Loadout full, waiting for `choose_equipment_slot`.
    EquipSlot { card: CardId },
}

impl CardMode {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, CardMode::None)
    }

    /// The card held back for this mode, if any.
    #[must_use]
    pub fn pending_card(&self) -> Option<CardId> {
        match *self {
            CardMode::Attack { card } | CardMode::ChargeMove { card, .. } | CardMode::EquipSlot { card } => Some(card),
            CardMode::None | CardMode::ChargeStrike { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::PlayerTurn.to_string(), "Player Turn");
        assert_eq!(Phase::default(), Phase::Setup);
    }

    #[test]
    fn test_pending_card() {
        let card = CardId::new(3);
        assert_eq!(CardMode::Attack { card }.pending_card(), Some(card));
        assert_eq!(CardMode::ChargeStrike { targets: vec![] }.pending_card(), None);
        assert!(CardMode::default().is_none());
    }
}
