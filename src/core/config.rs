//! Simulation configuration.
//!
//! Every tunable of the skirmish lives in `SimConfig`: grid size, hand and
//! equipment capacities, timing of the reaction window and movement, the
//! card values and the AI thresholds. Defaults match the shipped game.
//!
//! Configs are plain serde data and can be built with the `with_*` methods:
//!
//! ```
//! use dino_tactics::core::SimConfig;
//!
//! let config = SimConfig::default()
//!     .with_grid(8, 6)
//!     .with_max_hand_size(5)
//!     .with_seed(7);
//!
//! assert_eq!(config.grid_width, 8);
//! assert_eq!(config.max_hand_size, 5);
//! ```

use serde::{Deserialize, Serialize};

/// How many copies of each card go into a fresh deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckComposition {
    pub attack: usize,
    pub defend: usize,
    pub medicine: usize,
    pub charge: usize,
    pub meka_leg: usize,
    pub protection_gem: usize,
}

impl DeckComposition {
    /// A deck with only the four base card types, `count` of each.
    #[must_use]
    pub fn base_only(count: usize) -> Self {
        Self {
            attack: count,
            defend: count,
            medicine: count,
            charge: count,
            meka_leg: 0,
            protection_gem: 0,
        }
    }

    /// Total number of cards.
    #[must_use]
    pub fn total(&self) -> usize {
        self.attack + self.defend + self.medicine + self.charge + self.meka_leg + self.protection_gem
    }
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            attack: 10,
            defend: 10,
            medicine: 10,
            charge: 10,
            meka_leg: 3,
            protection_gem: 3,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width (x axis).
    pub grid_width: i32,

    /// Grid height (z axis).
    pub grid_height: i32,

    /// Maximum cards in any hand.
    pub max_hand_size: usize,

    /// Cards drawn into each hand when the game starts.
    pub initial_hand_size: usize,

    /// Cards drawn into the active side's hand at the start of its turn.
    pub cards_per_turn: usize,

    /// Equipment slots per unit.
    pub max_equipment_slots: usize,

    /// Seconds the player has to answer an incoming attack.
    pub reaction_time_limit: f32,

    /// Seconds the AI "thinks" before answering an incoming attack.
    pub ai_reaction_delay: f32,

    /// Seconds per tile of movement.
    pub move_step_seconds: f32,

    /// Seconds between start attempts while the presentation layer is not ready.
    pub init_retry_delay: f32,

    /// Maximum hop distance of a Charge move.
    pub charge_radius: u32,

    /// Flat damage of a Charge strike.
    pub charge_damage: i32,

    /// Health restored by a Medicine card.
    pub medicine_heal: i32,

    /// Chance that a Protection Gem blocks an incoming attack on its own.
    pub protection_gem_chance: f64,

    /// The AI only spends a Defend card on attacks above this damage.
    pub ai_defend_damage_threshold: i32,

    /// Chance the AI spends a Defend card when it is allowed to.
    pub ai_defend_chance: f64,

    /// Deck contents.
    pub deck: DeckComposition,

    /// Root seed for every random stream.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 12,
            grid_height: 12,
            max_hand_size: 10,
            initial_hand_size: 4,
            cards_per_turn: 2,
            max_equipment_slots: 4,
            reaction_time_limit: 10.0,
            ai_reaction_delay: 1.0,
            move_step_seconds: 0.25,
            init_retry_delay: 0.2,
            charge_radius: 5,
            charge_damage: 10,
            medicine_heal: 10,
            protection_gem_chance: 0.33,
            ai_defend_damage_threshold: 15,
            ai_defend_chance: 0.7,
            deck: DeckComposition::default(),
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Set the grid size.
    #[must_use]
    pub fn with_grid(mut self, width: i32, height: i32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Set the hand size limit.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the number of equipment slots per unit.
    #[must_use]
    pub fn with_equipment_slots(mut self, slots: usize) -> Self {
        self.max_equipment_slots = slots;
        self
    }

    /// Set the player's reaction window in seconds.
    #[must_use]
    pub fn with_reaction_time_limit(mut self, seconds: f32) -> Self {
        self.reaction_time_limit = seconds;
        self
    }

    /// Set seconds per tile of movement. Zero completes moves in one tick.
    #[must_use]
    pub fn with_move_step_seconds(mut self, seconds: f32) -> Self {
        self.move_step_seconds = seconds;
        self
    }

    /// Set the Protection Gem auto-defend chance.
    #[must_use]
    pub fn with_protection_gem_chance(mut self, chance: f64) -> Self {
        self.protection_gem_chance = chance;
        self
    }

    /// Set the AI's Defend-card chance.
    #[must_use]
    pub fn with_ai_defend_chance(mut self, chance: f64) -> Self {
        self.ai_defend_chance = chance;
        self
    }

    /// Set the deck composition.
    #[must_use]
    pub fn with_deck(mut self, deck: DeckComposition) -> Self {
        self.deck = deck;
        self
    }

    /// Set the root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Panic if the configuration cannot describe a playable skirmish.
    pub fn validate(&self) {
        assert!(self.grid_width > 0 && self.grid_height > 0, "Grid must be at least 1x1");
        assert!(self.max_hand_size > 0, "Hands must hold at least 1 card");
        assert!(self.max_equipment_slots > 0, "Units must have at least 1 equipment slot");
        assert!(self.reaction_time_limit >= 0.0, "Reaction window cannot be negative");
        assert!(self.ai_reaction_delay >= 0.0, "AI reaction delay cannot be negative");
        assert!(self.move_step_seconds >= 0.0, "Move step cannot be negative");
        assert!(
            (0.0..=1.0).contains(&self.protection_gem_chance),
            "Protection Gem chance must be in [0, 1]"
        );
        assert!(
            (0.0..=1.0).contains(&self.ai_defend_chance),
            "AI defend chance must be in [0, 1]"
        );
    }
}
