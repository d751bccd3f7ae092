//! Per-unit equipment slots.
//!
//! Equipment is declarative: holding a card of a given kind *is* the
//! capability. Other subsystems ask `has_equipment` instead of reading
//! flags off the unit, so removing a card removes its effect with it.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::cards::{Card, Deck, EquipmentKind};
use crate::core::{CardId, Rejection, Team, UnitId};

/// Result of equipping a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquipOutcome {
    /// Placed in a free slot.
    Equipped { slot: usize },
    /// Slots were full; the oldest item was discarded to make room.
    Replaced { slot: usize, discarded: CardId },
    /// Slots are full and the owner chooses what to replace. The card is
    /// handed back unplaced.
    SlotChoiceRequired(Card),
}

/// A replacement that could not be made. Carries the card back so it is
/// never lost.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("equipment slot {slot} does not exist ({filled} filled)")]
pub struct ReplaceError {
    pub card: Card,
    pub slot: usize,
    pub filled: usize,
}

impl ReplaceError {
    /// Split into the gameplay rejection and the returned card.
    #[must_use]
    pub fn into_parts(self) -> (Rejection, Card) {
        (
            Rejection::InvalidSlot {
                slot: self.slot,
                filled: self.filled,
            },
            self.card,
        )
    }
}

/// Equipped cards per unit, oldest first.
#[derive(Clone, Debug)]
pub struct EquipmentRegistry {
    slots: FxHashMap<UnitId, Vec<Card>>,
    capacity: usize,
}

impl EquipmentRegistry {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Units must have at least 1 equipment slot");
        Self {
            slots: FxHashMap::default(),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Equip `card` on `unit`.
    ///
    /// Interactive teams get `SlotChoiceRequired` when full and must follow
    /// up with `replace`. Other teams replace their oldest item.
    ///
    /// # Panics
    ///
    /// If `card` is not an equipment card.
    pub fn equip(&mut self, unit: UnitId, team: Team, card: Card, deck: &mut Deck) -> EquipOutcome {
        let kind = card
            .equipment_kind()
            .unwrap_or_else(|| panic!("{} is not equipment", card));

        let capacity = self.capacity;
        let equipped = self.slots.entry(unit).or_default();

        if equipped.len() < capacity {
            equipped.push(card);
            info!(%unit, equipment = kind.name(), filled = equipped.len(), capacity, "equipped");
            return EquipOutcome::Equipped {
                slot: equipped.len() - 1,
            };
        }

        if team.is_interactive() {
            debug!(%unit, "equipment slots full, waiting for slot choice");
            return EquipOutcome::SlotChoiceRequired(card);
        }

        let oldest = equipped.remove(0);
        equipped.push(card);
        info!(%unit, removed = oldest.name(), equipment = kind.name(), "replaced oldest equipment");
        let discarded = oldest.id;
        deck.discard(oldest);

        EquipOutcome::Replaced {
            slot: capacity - 1,
            discarded,
        }
    }

    /// Swap the card in `slot` for `card`, discarding the old one.
    ///
    /// Returns the id of the discarded card.
    pub fn replace(
        &mut self,
        unit: UnitId,
        slot: usize,
        card: Card,
        deck: &mut Deck,
    ) -> Result<CardId, ReplaceError> {
        let filled = self.slots.get(&unit).map_or(0, Vec::len);
        let Some(target) = self.slots.get_mut(&unit).and_then(|e| e.get_mut(slot)) else {
            return Err(ReplaceError { card, slot, filled });
        };

        let old = std::mem::replace(target, card);
        info!(%unit, slot, removed = old.name(), equipment = target.name(), "replaced equipment");
        let discarded = old.id;
        deck.discard(old);
        Ok(discarded)
    }

    /// Whether `unit` has at least one card of `kind` equipped.
    #[must_use]
    pub fn has_equipment(&self, unit: UnitId, kind: EquipmentKind) -> bool {
        self.equipment_of(unit)
            .iter()
            .any(|c| c.equipment_kind() == Some(kind))
    }

    /// Equipped cards, oldest first. Empty for unknown units.
    #[must_use]
    pub fn equipment_of(&self, unit: UnitId) -> &[Card] {
        self.slots.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn is_full(&self, unit: UnitId) -> bool {
        self.equipment_of(unit).len() >= self.capacity
    }

    /// Discard everything `unit` has equipped. Returns how many cards went.
    pub fn clear(&mut self, unit: UnitId, deck: &mut Deck) -> usize {
        let Some(equipped) = self.slots.remove(&unit) else {
            return 0;
        };
        let count = equipped.len();
        deck.discard_all(equipped);
        count
    }

    /// Total cards equipped across all units.
    #[must_use]
    pub fn total_equipped(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;
    use crate::core::GameRng;

    fn gear(id: u32, kind: EquipmentKind) -> Card {
        Card::new(CardId::new(id), CardKind::equipment(kind))
    }

    fn empty_deck() -> Deck {
        Deck::from_ordered(Vec::new(), GameRng::new(0))
    }

    #[test]
    fn test_equip_and_query() {
        let mut registry = EquipmentRegistry::new(4);
        let mut deck = empty_deck();
        let unit = UnitId::new(1);

        assert!(!registry.has_equipment(unit, EquipmentKind::MekaLeg));

        let outcome = registry.equip(unit, Team::Player, gear(0, EquipmentKind::MekaLeg), &mut deck);
        assert_eq!(outcome, EquipOutcome::Equipped { slot: 0 });
        assert!(registry.has_equipment(unit, EquipmentKind::MekaLeg));
        assert!(!registry.has_equipment(unit, EquipmentKind::ProtectionGem));
        assert!(!registry.has_equipment(UnitId::new(2), EquipmentKind::MekaLeg));
        assert_eq!(registry.equipment_of(unit).len(), 1);
    }

    #[test]
    fn test_ai_replaces_oldest() {
        let mut registry = EquipmentRegistry::new(2);
        let mut deck = empty_deck();
        let unit = UnitId::new(7);

        registry.equip(unit, Team::Enemy, gear(0, EquipmentKind::MekaLeg), &mut deck);
        registry.equip(unit, Team::Enemy, gear(1, EquipmentKind::ProtectionGem), &mut deck);
        let outcome = registry.equip(unit, Team::Enemy, gear(2, EquipmentKind::ProtectionGem), &mut deck);

        match outcome {
            EquipOutcome::Replaced { slot, discarded } => {
                assert_eq!(slot, 1);
                assert_eq!(discarded, CardId::new(0));
            }
            other => panic!("expected replacement, got {:?}", other),
        }
        assert!(!registry.has_equipment(unit, EquipmentKind::MekaLeg));
        assert_eq!(deck.discard_count(), 1);
        let ids: Vec<_> = registry.equipment_of(unit).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CardId::new(1), CardId::new(2)]);
    }

    #[test]
    fn test_player_full_requires_choice() {
        let mut registry = EquipmentRegistry::new(1);
        let mut deck = empty_deck();
        let unit = UnitId::new(0);

        registry.equip(unit, Team::Player, gear(0, EquipmentKind::MekaLeg), &mut deck);
        let outcome = registry.equip(unit, Team::Player, gear(1, EquipmentKind::ProtectionGem), &mut deck);

        assert_eq!(outcome, EquipOutcome::SlotChoiceRequired(gear(1, EquipmentKind::ProtectionGem)));
        assert_eq!(deck.discard_count(), 0);
        assert_eq!(registry.total_equipped(), 1);
    }

    #[test]
    fn test_replace_slot() {
        let mut registry = EquipmentRegistry::new(2);
        let mut deck = empty_deck();
        let unit = UnitId::new(0);

        registry.equip(unit, Team::Player, gear(0, EquipmentKind::MekaLeg), &mut deck);
        registry.equip(unit, Team::Player, gear(1, EquipmentKind::MekaLeg), &mut deck);

        let old = registry
            .replace(unit, 0, gear(2, EquipmentKind::ProtectionGem), &mut deck)
            .unwrap();
        assert_eq!(old, CardId::new(0));
        assert!(registry.has_equipment(unit, EquipmentKind::ProtectionGem));
        assert_eq!(deck.discard_count(), 1);
    }

    #[test]
    fn test_replace_invalid_slot_returns_card() {
        let mut registry = EquipmentRegistry::new(2);
        let mut deck = empty_deck();
        let unit = UnitId::new(0);
        registry.equip(unit, Team::Player, gear(0, EquipmentKind::MekaLeg), &mut deck);

        let err = registry
            .replace(unit, 3, gear(5, EquipmentKind::ProtectionGem), &mut deck)
            .unwrap_err();
        assert_eq!(err.to_string(), "equipment slot 3 does not exist (1 filled)");

        let (rejection, card) = err.into_parts();
        assert_eq!(rejection, Rejection::InvalidSlot { slot: 3, filled: 1 });
        assert_eq!(card.id, CardId::new(5));
        assert_eq!(deck.discard_count(), 0);
    }

    #[test]
    fn test_clear_discards() {
        let mut registry = EquipmentRegistry::new(4);
        let mut deck = empty_deck();
        let unit = UnitId::new(3);
        registry.equip(unit, Team::Enemy, gear(0, EquipmentKind::MekaLeg), &mut deck);
        registry.equip(unit, Team::Enemy, gear(1, EquipmentKind::ProtectionGem), &mut deck);

        assert_eq!(registry.clear(unit, &mut deck), 2);
        assert_eq!(deck.discard_count(), 2);
        assert!(registry.equipment_of(unit).is_empty());
        assert_eq!(registry.clear(unit, &mut deck), 0);
    }

    #[test]
    #[should_panic(expected = "is not equipment")]
    fn test_equip_non_equipment_panics() {
        let mut registry = EquipmentRegistry::new(4);
        let mut deck = empty_deck();
        let card = Card::new(CardId::new(0), CardKind::Attack);
        registry.equip(UnitId::new(0), Team::Player, card, &mut deck);
    }
}
