//! Shared world state.
//!
//! ## GameState
//!
//! Everything the subsystems act on, owned in one place:
//! - Battlefield (grid, units, rosters)
//! - Deck and the two hands
//! - Equipment registry
//! - Reaction RNG stream
//! - Event outbox and action history
//!
//! Subsystems borrow it mutably for the duration of one operation; nothing
//! is reachable through globals.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::action::{Action, ActionRecord};
use super::config::SimConfig;
use super::entity::{CardId, UnitId};
use super::event::SimEvent;
use super::rng::GameRng;
use super::team::{Team, TeamMap};
use crate::cards::{Card, Deck, Hand};
use crate::equipment::EquipmentRegistry;
use crate::grid::Grid;
use crate::units::{Battlefield, DamageOutcome};

/// Where every card currently is.
///
/// `total()` stays equal to the deck size for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCensus {
    pub draw_pile: usize,
    pub discard_pile: usize,
    pub hands: usize,
    pub equipped: usize,
}

impl CardCensus {
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw_pile + self.discard_pile + self.hands + self.equipped
    }
}

/// The complete simulation world.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: SimConfig,
    pub battlefield: Battlefield,
    pub deck: Deck,
    pub hands: TeamMap<Hand>,
    pub equipment: EquipmentRegistry,

    /// Turn number (starts at 1 on the first player turn).
    pub turn_number: u32,

    /// Side whose actions are being recorded.
    pub active_team: Team,

    reaction_rng: GameRng,
    action_sequence: u32,
    events: Vec<SimEvent>,
    history: Vector<ActionRecord>,
}

impl GameState {
    /// Build the world for `config`. Units are added afterwards.
    ///
    /// # Panics
    ///
    /// If the config is invalid.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        config.validate();

        let root = GameRng::new(config.seed);
        let deck = Deck::new(&config.deck, root.for_context("shuffle"));
        let grid = Grid::new(config.grid_width, config.grid_height);
        let hand_size = config.max_hand_size;

        Self {
            battlefield: Battlefield::new(grid),
            deck,
            hands: TeamMap::new(|_| Hand::new(hand_size)),
            equipment: EquipmentRegistry::new(config.max_equipment_slots),
            turn_number: 0,
            active_team: Team::Player,
            reaction_rng: root.for_context("reaction"),
            action_sequence: 0,
            events: Vec::new(),
            history: Vector::new(),
            config,
        }
    }

    // === Events ===

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // === History ===

    /// Append a committed action. `team` is the side that acted, which is
    /// not always the active team (a Defend played in reaction).
    pub fn record(&mut self, team: Team, action: Action) {
        self.action_sequence += 1;
        let record = ActionRecord::new(team, action, self.turn_number, self.action_sequence);
        debug!(team = %record.team, turn = record.turn, seq = record.sequence, action = ?record.action, "action");
        self.history.push_back(record);
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Begin a new turn for `team`.
    pub fn begin_turn(&mut self, team: Team) {
        self.turn_number += 1;
        self.active_team = team;
        self.action_sequence = 0;
    }

    // === Cards ===

    /// Draw into a team's hand, reporting draws and reshuffles.
    pub fn draw_into(&mut self, team: Team, count: usize) -> Vec<CardId> {
        let reshuffles = self.deck.reshuffle_count();
        let drawn = self.deck.draw(count, &mut self.hands[team]);

        if self.deck.reshuffle_count() != reshuffles {
            let draw_pile = self.deck.draw_count();
            self.emit(SimEvent::DeckReshuffled { draw_pile });
        }
        debug!(%team, drawn = drawn.len(), hand = self.hands[team].len(), "drew cards");
        self.emit(SimEvent::CardsDrawn {
            team,
            cards: drawn.clone(),
        });
        drawn
    }

    /// Remove a card from a team's hand.
    ///
    /// # Panics
    ///
    /// If the card is not in that hand.
    pub fn take_card(&mut self, team: Team, card: CardId) -> Card {
        self.hands[team].take(card)
    }

    /// Counts per card location.
    #[must_use]
    pub fn census(&self) -> CardCensus {
        CardCensus {
            draw_pile: self.deck.draw_count(),
            discard_pile: self.deck.discard_count(),
            hands: self.hands.iter().map(|(_, h)| h.len()).sum(),
            equipped: self.equipment.total_equipped(),
        }
    }

    /// Label shown next to a played card: the unit's name, prefixed with
    /// "Enemy" for AI units.
    #[must_use]
    pub fn actor_label(&self, unit: UnitId) -> String {
        match self.battlefield.unit(unit) {
            Some(u) if u.team == Team::Enemy => format!("Enemy {}", u.name),
            Some(u) => u.name.clone(),
            None => unit.to_string(),
        }
    }

    // === Randomness ===

    /// Uniform sample in `[0, 1)` from the reaction stream.
    pub fn reaction_roll(&mut self) -> f64 {
        self.reaction_rng.gen_unit()
    }

    // === Unit lifecycle ===

    /// Run one damage event against `unit`, removing it if it dies.
    ///
    /// Returns `None` if the unit is not on the battlefield.
    pub fn apply_damage(&mut self, unit: UnitId, incoming: i32) -> Option<DamageOutcome> {
        let outcome = self.battlefield.unit_mut(unit)?.take_damage(incoming);

        if let DamageOutcome::Taken { amount, remaining } = outcome {
            self.emit(SimEvent::UnitDamaged { unit, amount, remaining });
        }
        if outcome.is_lethal() {
            self.kill(unit);
        }
        Some(outcome)
    }

    /// Restore health. Returns the amount restored.
    pub fn heal(&mut self, unit: UnitId, amount: i32) -> Option<i32> {
        let target = self.battlefield.unit_mut(unit)?;
        let healed = target.heal(amount);
        let remaining = target.stats.current_health;
        self.emit(SimEvent::UnitHealed {
            unit,
            amount: healed,
            remaining,
        });
        Some(healed)
    }

    /// Take a unit off the field and discard its equipment.
    fn kill(&mut self, unit: UnitId) {
        if let Some(dead) = self.battlefield.remove(unit) {
            let discarded = self.equipment.clear(unit, &mut self.deck);
            info!(unit = %dead.id, name = %dead.name, team = %dead.team, discarded, "unit defeated");
            self.emit(SimEvent::UnitDied { unit });
        }
    }
}
