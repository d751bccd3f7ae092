//! Turn orchestration: phases, player input, movement and the enemy script.
//!
//! `Simulation` is the top-level object. It owns the `GameState` and the
//! `ReactionProtocol` and sequences player and enemy turns until the owner
//! calls `end_game`.

pub mod enemy;
mod movement;
mod phase;
mod simulation;

pub use enemy::{EnemyScript, EnemyStage};
pub use movement::{MovePurpose, MoveProgress, Movement};
pub use phase::{CardMode, Phase};
pub use simulation::Simulation;
