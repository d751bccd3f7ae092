//! # dino-tactics
//!
//! Logic core for a grid-based tactical card battler.
//!
//! Two sides take turns on a fixed grid. Units move, attack and play cards
//! drawn from a shared deck; attacks are suspended while the defender gets a
//! chance to answer with a Defend card. Rendering and input devices are left
//! to the caller: the core takes clicks and elapsed time, and hands back
//! `SimEvent`s.
//!
//! ## Design Principles
//!
//! 1. **One owner**: `Simulation` owns every subsystem. Nothing is reachable
//!    through globals.
//!
//! 2. **Explicit time**: movement, the reaction window and the AI's thinking
//!    delay are state objects advanced by `Simulation::tick`.
//!
//! 3. **Rejections are values**: illegal input returns a `Rejection` and
//!    changes nothing. Contract violations panic.
//!
//! 4. **Deterministic**: every random draw comes from a seeded `GameRng`.
//!
//! ## Modules
//!
//! - `core`: IDs, teams, RNG, configuration, errors, events, history, world state
//! - `grid`: coordinates, cells, reachability and A* search
//! - `cards`: card kinds, deck and hands
//! - `equipment`: per-unit equipment slots
//! - `units`: unit stats and flags, the battlefield
//! - `reaction`: the attack interrupt protocol
//! - `turn`: the turn orchestrator and enemy AI
//!
//! ## Example
//!
//! ```
//! use dino_tactics::{Coord, Phase, SimConfig, Simulation, Team, UnitSpec};
//!
//! let mut sim = Simulation::new(SimConfig::default().with_seed(3));
//! let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
//! sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(8, 8));
//! sim.start();
//!
//! sim.select_unit(rex).unwrap();
//! sim.on_cell_clicked(Coord::new(0, 2)).unwrap();
//! sim.tick(1.0);
//!
//! assert_eq!(sim.phase(), Phase::PlayerTurn);
//! assert_eq!(sim.state().battlefield.unit(rex).unwrap().position(), Coord::new(0, 2));
//! ```

pub mod cards;
pub mod core;
pub mod equipment;
pub mod grid;
pub mod reaction;
pub mod turn;
pub mod units;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, CardCensus, CardId, DeckComposition, GameRng, GameState, HighlightPurpose, Rejection,
    SimConfig, SimEvent, Team, TeamMap, UnitId,
};

pub use crate::grid::{find_path, landing_tiles, reachable_tiles, Cell, Coord, Grid};

pub use crate::cards::{Card, CardKind, Deck, EquipmentKind, Hand};

pub use crate::equipment::{EquipOutcome, EquipmentRegistry, ReplaceError};

pub use crate::units::{Battlefield, DamageOutcome, Stats, TurnFlags, Unit, UnitSpec};

pub use crate::reaction::{BlockSource, ReactionContext, ReactionOutcome, ReactionProtocol, ReactionStatus, Responder};

pub use crate::turn::{CardMode, Phase, Simulation};
