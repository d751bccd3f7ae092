//! Card kinds and card instances.
//!
//! A card's behaviour is decided by a single match on `CardKind`. Name and
//! description are fixed per kind; only equipment carries per-instance
//! fields (its use counters).

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Passive modifiers a unit can equip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    /// Attacking no longer uses up the unit's attack for the turn.
    MekaLeg,
    /// Chance to block an incoming attack without a Defend card.
    ProtectionGem,
}

impl EquipmentKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EquipmentKind::MekaLeg => "Meka Leg",
            EquipmentKind::ProtectionGem => "Protection Gem",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            EquipmentKind::MekaLeg => "Allows multiple attacks per turn",
            EquipmentKind::ProtectionGem => "33% chance to auto-defend when attacked",
        }
    }
}

/// What a card does when played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Defend,
    Medicine,
    Charge,
    /// `max_uses == 0` means unlimited. Counters are informational only;
    /// equipment effects are never consumed.
    Equipment {
        kind: EquipmentKind,
        max_uses: u32,
        current_uses: u32,
    },
}

impl CardKind {
    /// Equipment card of the given kind with unlimited uses.
    #[must_use]
    pub const fn equipment(kind: EquipmentKind) -> Self {
        CardKind::Equipment {
            kind,
            max_uses: 0,
            current_uses: 0,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Attack => "Attack",
            CardKind::Defend => "Defend",
            CardKind::Medicine => "Medicine",
            CardKind::Charge => "Charge",
            CardKind::Equipment { kind, .. } => kind.name(),
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            CardKind::Attack => "Deal damage to an enemy in range",
            CardKind::Defend => "Block the next enemy attack",
            CardKind::Medicine => "Restore 10 HP",
            CardKind::Charge => "Move up to 5 tiles and deal 10 damage to adjacent enemy",
            CardKind::Equipment { kind, .. } => kind.description(),
        }
    }

    /// The equipment kind, for equipment cards.
    #[must_use]
    pub const fn equipment_kind(self) -> Option<EquipmentKind> {
        match self {
            CardKind::Equipment { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Same kind of card, ignoring equipment use counters.
    #[must_use]
    pub fn same_kind(self, other: CardKind) -> bool {
        match (self, other) {
            (CardKind::Equipment { kind: a, .. }, CardKind::Equipment { kind: b, .. }) => a == b,
            _ => self == other,
        }
    }
}

/// One physical card.
///
/// Not `Copy`: a card lives in exactly one place (draw pile, hand, discard
/// pile or a unit's equipment) and moves between them by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, kind: CardKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.kind.description()
    }

    #[must_use]
    pub fn is_defend(&self) -> bool {
        matches!(self.kind, CardKind::Defend)
    }

    #[must_use]
    pub const fn equipment_kind(&self) -> Option<EquipmentKind> {
        self.kind.equipment_kind()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(CardKind::Attack.name(), "Attack");
        assert_eq!(CardKind::Medicine.description(), "Restore 10 HP");

        let gem = CardKind::equipment(EquipmentKind::ProtectionGem);
        assert_eq!(gem.name(), "Protection Gem");
        assert_eq!(gem.description(), "33% chance to auto-defend when attacked");
        assert_eq!(gem.equipment_kind(), Some(EquipmentKind::ProtectionGem));
        assert_eq!(CardKind::Charge.equipment_kind(), None);
    }

    #[test]
    fn test_equipment_is_unlimited() {
        match CardKind::equipment(EquipmentKind::MekaLeg) {
            CardKind::Equipment { max_uses, current_uses, .. } => {
                assert_eq!(max_uses, 0);
                assert_eq!(current_uses, 0);
            }
            other => panic!("expected equipment, got {:?}", other),
        }
    }

    #[test]
    fn test_same_kind_ignores_counters() {
        let a = CardKind::Equipment {
            kind: EquipmentKind::MekaLeg,
            max_uses: 3,
            current_uses: 1,
        };
        assert!(a.same_kind(CardKind::equipment(EquipmentKind::MekaLeg)));
        assert!(!a.same_kind(CardKind::equipment(EquipmentKind::ProtectionGem)));
        assert!(CardKind::Defend.same_kind(CardKind::Defend));
        assert!(!CardKind::Defend.same_kind(CardKind::Attack));
    }

    #[test]
    fn test_card_display() {
        let card = Card::new(CardId::new(4), CardKind::Defend);
        assert!(card.is_defend());
        assert_eq!(format!("{}", card), "Defend [Card(4)]");
    }
}
