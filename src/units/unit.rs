//! Combat units: stats, per-turn flags and damage rules.

use serde::{Deserialize, Serialize};

use crate::core::{Team, UnitId};
use crate::grid::Coord;

/// Combat statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub max_health: i32,
    pub current_health: i32,
    pub attack_power: i32,
    pub defense: i32,
    pub move_range: u32,
    pub attack_range: u32,
}

impl Stats {
    /// Full-health stats.
    #[must_use]
    pub fn new(max_health: i32, attack_power: i32, defense: i32, move_range: u32, attack_range: u32) -> Self {
        assert!(max_health > 0, "Units need positive max health");
        Self {
            max_health,
            current_health: max_health,
            attack_power,
            defense,
            move_range,
            attack_range,
        }
    }

    #[must_use]
    pub fn with_attack_power(mut self, attack_power: i32) -> Self {
        self.attack_power = attack_power;
        self
    }

    #[must_use]
    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    #[must_use]
    pub fn with_move_range(mut self, move_range: u32) -> Self {
        self.move_range = move_range;
        self
    }

    #[must_use]
    pub fn with_attack_range(mut self, attack_range: u32) -> Self {
        self.attack_range = attack_range;
        self
    }

    /// Start below full health. Clamped to `[0, max_health]`.
    #[must_use]
    pub fn with_current_health(mut self, health: i32) -> Self {
        self.current_health = health.clamp(0, self.max_health);
        self
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new(100, 20, 5, 3, 1)
    }
}

/// What a unit has done this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    pub has_moved: bool,
    pub has_attacked: bool,
    /// Negates the next damage event, then clears. Survives turn resets.
    pub is_defending: bool,
    /// Set while a movement is in progress.
    pub is_moving: bool,
}

/// Result of one damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The defending flag absorbed the hit.
    Negated,
    /// Health was lost.
    Taken { amount: i32, remaining: i32 },
}

impl DamageOutcome {
    /// Health actually lost.
    #[must_use]
    pub fn amount(self) -> i32 {
        match self {
            DamageOutcome::Negated => 0,
            DamageOutcome::Taken { amount, .. } => amount,
        }
    }

    /// Whether this hit left the unit at zero health.
    #[must_use]
    pub fn is_lethal(self) -> bool {
        matches!(self, DamageOutcome::Taken { remaining: 0, .. })
    }
}

/// Everything needed to place a new unit.
///
/// ```
/// use dino_tactics::core::Team;
/// use dino_tactics::units::{Stats, UnitSpec};
///
/// let raptor = UnitSpec::new("Raptor", Team::Enemy)
///     .with_stats(Stats::default().with_move_range(5));
///
/// assert_eq!(raptor.stats.move_range, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub team: Team,
    pub stats: Stats,
}

impl UnitSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            name: name.into(),
            team,
            stats: Stats::default(),
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }
}

/// A unit on the battlefield.
///
/// `position` is read-only from outside the crate; `Battlefield::occupy`
/// moves it together with the grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub stats: Stats,
    pub flags: TurnFlags,
    pub(crate) position: Coord,
}

impl Unit {
    pub(crate) fn new(id: UnitId, spec: UnitSpec, position: Coord) -> Self {
        Self {
            id,
            name: spec.name,
            team: spec.team,
            stats: spec.stats,
            flags: TurnFlags::default(),
            position,
        }
    }

    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.stats.current_health > 0
    }

    #[must_use]
    pub fn can_move(&self) -> bool {
        !self.flags.has_moved && !self.flags.is_moving
    }

    /// Ignores MekaLeg; the reaction protocol decides whether an attack
    /// spends the flag.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        !self.flags.has_attacked
    }

    /// Whether the unit can still do anything worth selecting it for.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.can_move() || self.can_attack()
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub fn distance_to(&self, coord: Coord) -> u32 {
        self.position.manhattan(coord)
    }

    /// Apply one damage event.
    ///
    /// A defending unit takes nothing and stops defending. Otherwise the
    /// unit loses `max(1, incoming - defense)`, floored at zero health.
    pub fn take_damage(&mut self, incoming: i32) -> DamageOutcome {
        if self.flags.is_defending {
            self.flags.is_defending = false;
            return DamageOutcome::Negated;
        }

        let actual = incoming.saturating_sub(self.stats.defense).max(1);
        let before = self.stats.current_health;
        self.stats.current_health = (before - actual).clamp(0, self.stats.max_health);

        DamageOutcome::Taken {
            amount: before - self.stats.current_health,
            remaining: self.stats.current_health,
        }
    }

    /// Restore health up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.stats.current_health;
        self.stats.current_health = (before + amount.max(0)).min(self.stats.max_health);
        self.stats.current_health - before
    }

    /// Start-of-turn reset. Leaves `is_defending` alone.
    pub fn reset_turn(&mut self) {
        self.flags.has_moved = false;
        self.flags.has_attacked = false;
    }
}
