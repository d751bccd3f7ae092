//! Enemy turn script.
//!
//! Each enemy unit acts once per turn, in roster order, through a fixed
//! sequence: defend, heal, charge, approach, attack. Once its actions are
//! spent it puts on one piece of held equipment. Steps that start a
//! movement or an attack suspend the script until the simulation reports
//! the movement finished or the reaction resolved.
//!
//! The planning functions here only read the world; `Simulation` applies
//! their decisions.

use std::collections::VecDeque;

use crate::cards::CardKind;
use crate::core::{CardId, GameState, UnitId};
use crate::grid::{find_path, landing_tiles, reachable_tiles, Coord};

/// Where one enemy unit is in its sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStage {
    /// Pick a target and play support cards.
    Opening,
    /// Charge landed; strike the target.
    ChargeStrike { target: UnitId },
    /// Close distance to the nearest player unit.
    Approach,
    Attack,
    /// Equip one held equipment card.
    Equip,
    Done,
}

/// Progress through the enemy roster for one turn.
#[derive(Clone, Debug)]
pub struct EnemyScript {
    queue: VecDeque<UnitId>,
    stage: EnemyStage,
}

impl EnemyScript {
    /// Script for the units of `roster`, acting in that order.
    #[must_use]
    pub fn new(roster: &[UnitId]) -> Self {
        Self {
            queue: roster.iter().copied().collect(),
            stage: EnemyStage::Opening,
        }
    }

    /// The acting unit and its stage. `None` once every unit is done.
    #[must_use]
    pub fn current(&self) -> Option<(UnitId, EnemyStage)> {
        self.queue.front().map(|&unit| (unit, self.stage))
    }

    pub fn set_stage(&mut self, stage: EnemyStage) {
        self.stage = stage;
    }

    /// Move on to the next unit.
    pub fn next_unit(&mut self) {
        self.queue.pop_front();
        self.stage = EnemyStage::Opening;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Support cards an enemy plays before moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SupportPlan {
    pub defend: Option<CardId>,
    pub medicine: Option<CardId>,
}

/// A Charge the enemy has committed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargePlan {
    pub card: CardId,
    pub path: Vec<Coord>,
}

/// Defend below a third of max health, heal below max health.
#[must_use]
pub fn plan_support(state: &GameState, unit: UnitId) -> SupportPlan {
    let Some(me) = state.battlefield.unit(unit) else {
        return SupportPlan::default();
    };
    let hand = &state.hands[me.team];
    let stats = &me.stats;

    let defend = if stats.current_health * 3 < stats.max_health {
        hand.first_of(CardKind::Defend)
    } else {
        None
    };
    let medicine = if stats.current_health < stats.max_health {
        hand.first_of(CardKind::Medicine)
    } else {
        None
    };

    SupportPlan { defend, medicine }
}

/// Charge when the target is out of attack range but within charge radius
/// and a free tile next to it can be reached.
///
/// The landing closest to the unit wins, ties broken by coordinate.
#[must_use]
pub fn plan_charge(state: &GameState, unit: UnitId, target: UnitId) -> Option<ChargePlan> {
    let me = state.battlefield.unit(unit)?;
    let them = state.battlefield.unit(target)?;
    let distance = me.distance_to(them.position());
    let radius = state.config.charge_radius;

    if distance <= me.stats.attack_range || distance > radius {
        return None;
    }
    let card = state.hands[me.team].first_of(CardKind::Charge)?;

    let grid = state.battlefield.grid();
    let landing = landing_tiles(grid, me.position(), radius, &[them.position()])
        .into_iter()
        .min_by_key(|&c| (me.distance_to(c), c))?;
    let path = find_path(grid, me.position(), landing)?;

    Some(ChargePlan { card, path })
}

/// Target for a Charge strike: the intended target if still adjacent,
/// otherwise any adjacent player unit.
#[must_use]
pub fn charge_strike_target(state: &GameState, unit: UnitId, intended: UnitId) -> Option<UnitId> {
    let me = state.battlefield.unit(unit)?;
    let adjacent = |id: UnitId| {
        state
            .battlefield
            .unit(id)
            .is_some_and(|u| u.position().is_adjacent(me.position()))
    };

    if adjacent(intended) {
        return Some(intended);
    }
    state
        .battlefield
        .roster(me.team.opponent())
        .iter()
        .copied()
        .find(|&id| adjacent(id))
}

/// Path toward `target` when it is out of attack range.
///
/// Picks the reachable tile closest to the target (ties by coordinate) and
/// only moves if that tile is closer than where the unit stands.
#[must_use]
pub fn plan_approach(state: &GameState, unit: UnitId, target: UnitId) -> Option<Vec<Coord>> {
    let me = state.battlefield.unit(unit)?;
    let goal = state.battlefield.unit(target)?.position();
    let current = me.distance_to(goal);

    if current <= me.stats.attack_range || !me.can_move() {
        return None;
    }

    let grid = state.battlefield.grid();
    let (distance, tile) = reachable_tiles(grid, me.position(), me.stats.move_range)
        .into_iter()
        .map(|c| (c.manhattan(goal), c))
        .min()?;

    if distance >= current {
        return None;
    }
    find_path(grid, me.position(), tile)
}

/// Attack card to use on `target`, if it is in range and the unit may attack.
#[must_use]
pub fn plan_attack(state: &GameState, unit: UnitId, target: UnitId) -> Option<CardId> {
    let me = state.battlefield.unit(unit)?;
    let them = state.battlefield.unit(target)?;

    if me.distance_to(them.position()) > me.stats.attack_range || !me.can_attack() {
        return None;
    }
    state.hands[me.team].first_of(CardKind::Attack)
}

/// First equipment card in the unit's hand.
#[must_use]
pub fn plan_equip(state: &GameState, unit: UnitId) -> Option<CardId> {
    let me = state.battlefield.unit(unit)?;
    state.hands[me.team]
        .iter()
        .find(|c| c.equipment_kind().is_some())
        .map(|c| c.id)
}
