//! Units and the battlefield that holds them.

pub mod battlefield;
pub mod unit;

pub use battlefield::Battlefield;
pub use unit::{DamageOutcome, Stats, TurnFlags, Unit, UnitSpec};
