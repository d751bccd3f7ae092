//! Core types: identifiers, teams, RNG, configuration, errors, events,
//! action history and the shared world state.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod rng;
pub mod state;
pub mod team;

pub use action::{Action, ActionRecord};
pub use config::{DeckComposition, SimConfig};
pub use entity::{CardId, UnitId};
pub use error::Rejection;
pub use event::{HighlightPurpose, SimEvent};
pub use rng::GameRng;
pub use state::{CardCensus, GameState};
pub use team::{Team, TeamMap};
