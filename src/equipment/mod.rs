//! Equipment registry: per-unit slots with capacity and replacement policy.

pub mod registry;

pub use registry::{EquipOutcome, EquipmentRegistry, ReplaceError};
