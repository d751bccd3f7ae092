//! Attack interrupt state machine.
//!
//! An attack does not land immediately. `initiate` first gives equipment a
//! chance to block it, then suspends it while the defender decides:
//!
//! ```text
//! Idle ──initiate──> Pending ──defend──> Blocked
//!   │                   │
//!   │ (gem roll)        └──decline / expiry / AI takes hit──> DamageTaken
//!   └──────────> Blocked
//! ```
//!
//! Player defenders get a timed window and answer with a Defend card.
//! AI defenders "think" for a fixed delay, then apply a fixed heuristic.
//! Either way the outcome is committed by `resolve`, which is also the only
//! place that spends the attacker's attack for the turn.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::{Card, CardKind, EquipmentKind};
use crate::core::{Action, CardId, GameState, Rejection, SimEvent, Team, UnitId};
use crate::units::DamageOutcome;

/// What stopped an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockSource {
    /// A Defend card played in response.
    DefendCard(CardId),
    /// The defender's Protection Gem triggered.
    ProtectionGem,
    /// The defender was already defending from an earlier Defend card.
    Stance,
}

/// How a suspended attack ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionOutcome {
    Blocked {
        attacker: UnitId,
        defender: UnitId,
        source: BlockSource,
    },
    DamageTaken {
        attacker: UnitId,
        defender: UnitId,
        amount: i32,
        died: bool,
    },
    /// Dropped without effect, e.g. by ending the turn.
    Cancelled { attacker: UnitId, defender: UnitId },
}

impl ReactionOutcome {
    #[must_use]
    pub fn attacker(&self) -> UnitId {
        match *self {
            ReactionOutcome::Blocked { attacker, .. }
            | ReactionOutcome::DamageTaken { attacker, .. }
            | ReactionOutcome::Cancelled { attacker, .. } => attacker,
        }
    }

    #[must_use]
    pub fn defender(&self) -> UnitId {
        match *self {
            ReactionOutcome::Blocked { defender, .. }
            | ReactionOutcome::DamageTaken { defender, .. }
            | ReactionOutcome::Cancelled { defender, .. } => defender,
        }
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, ReactionOutcome::Blocked { .. })
    }
}

/// Who answers a pending attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Responder {
    /// External input through `respond_with_defend` / `decline`.
    Player,
    /// Built-in heuristic once the thinking delay runs out.
    Ai,
}

/// A suspended attack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionContext {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub pending_damage: i32,
    /// Seconds until the window closes (player) or the AI decides.
    pub remaining_time: f32,
    pub responder: Responder,
}

/// Status returned by `initiate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionStatus {
    /// Settled immediately.
    Resolved(ReactionOutcome),
    /// Waiting for this defender to respond.
    AwaitingResponse(UnitId),
}

/// Holds at most one suspended attack.
#[derive(Clone, Debug, Default)]
pub struct ReactionProtocol {
    pending: Option<ReactionContext>,
}

impl ReactionProtocol {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn context(&self) -> Option<&ReactionContext> {
        self.pending.as_ref()
    }

    /// Start resolving an attack of `damage` from `attacker` on `defender`.
    ///
    /// Rejected while another attack is pending.
    pub fn initiate(
        &mut self,
        state: &mut GameState,
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
    ) -> Result<ReactionStatus, Rejection> {
        if self.pending.is_some() {
            return Err(Rejection::ReactionPending);
        }
        if state.battlefield.unit(attacker).is_none() {
            return Err(Rejection::UnknownUnit(attacker));
        }
        let defender_team = state
            .battlefield
            .unit(defender)
            .map(|u| u.team)
            .ok_or(Rejection::UnknownUnit(defender))?;

        info!(%attacker, %defender, damage, "attack initiated");

        let mut context = ReactionContext {
            attacker,
            defender,
            pending_damage: damage,
            remaining_time: 0.0,
            responder: Responder::Player,
        };

        if state.equipment.has_equipment(defender, EquipmentKind::ProtectionGem) {
            let roll = state.reaction_roll();
            let chance = state.config.protection_gem_chance;
            debug!(%defender, roll, chance, "protection gem roll");

            if roll < chance {
                info!(%defender, "protection gem activated");
                if let Some(unit) = state.battlefield.unit_mut(defender) {
                    unit.flags.is_defending = true;
                }
                let actor = format!("{} (Protection Gem)", state.actor_label(defender));
                state.emit(SimEvent::CardPlayed {
                    card: None,
                    kind: CardKind::Defend,
                    actor,
                });
                state.record(defender_team, Action::AutoDefend { unit: defender });
                let outcome = Self::resolve(state, context, Some(BlockSource::ProtectionGem));
                return Ok(ReactionStatus::Resolved(outcome));
            }
        }

        if defender_team.is_interactive() {
            context.remaining_time = state.config.reaction_time_limit;
            let eligible = state.hands[defender_team].defend_cards();
            debug!(%defender, eligible = eligible.len(), "reaction window opened");
            state.emit(SimEvent::ReactionOpened {
                attacker,
                defender,
                damage,
                deadline_seconds: context.remaining_time,
                eligible,
            });
        } else {
            context.responder = Responder::Ai;
            context.remaining_time = state.config.ai_reaction_delay;
        }

        self.pending = Some(context);
        Ok(ReactionStatus::AwaitingResponse(defender))
    }

    /// Advance the countdown. Returns the outcome if the attack settled.
    pub fn tick(&mut self, state: &mut GameState, dt: f32) -> Option<ReactionOutcome> {
        let context = self.pending.as_mut()?;
        context.remaining_time -= dt;
        if context.remaining_time > 0.0 {
            return None;
        }

        let context = self.pending.take()?;
        let outcome = match context.responder {
            Responder::Player => {
                info!(defender = %context.defender, "reaction time expired");
                Self::resolve(state, context, None)
            }
            Responder::Ai => Self::ai_respond(state, context),
        };
        Some(outcome)
    }

    /// Answer the pending attack with a Defend card from the player's hand.
    ///
    /// # Panics
    ///
    /// If `card` is not in the player's hand.
    pub fn respond_with_defend(&mut self, state: &mut GameState, card: CardId) -> Result<ReactionOutcome, Rejection> {
        let context = self.player_context()?;

        let team = Team::Player;
        let held = state.hands[team]
            .get(card)
            .unwrap_or_else(|| panic!("{} is not in the acting hand", card));
        if !held.is_defend() {
            return Err(Rejection::NotDefendCard);
        }

        self.pending = None;
        let card = state.take_card(team, card);
        let id = card.id;
        Self::play_defend(state, context.defender, team, card);
        Ok(Self::resolve(state, context, Some(BlockSource::DefendCard(id))))
    }

    /// Take the hit now instead of waiting for the window to close.
    pub fn decline(&mut self, state: &mut GameState) -> Result<ReactionOutcome, Rejection> {
        let context = self.player_context()?;
        self.pending = None;
        debug!(defender = %context.defender, "reaction declined");
        Ok(Self::resolve(state, context, None))
    }

    /// Drop the pending attack without applying it.
    pub fn cancel(&mut self, state: &mut GameState) -> Option<ReactionOutcome> {
        let context = self.pending.take()?;
        let outcome = ReactionOutcome::Cancelled {
            attacker: context.attacker,
            defender: context.defender,
        };
        info!(attacker = %context.attacker, defender = %context.defender, "pending attack cancelled");
        state.emit(SimEvent::ReactionClosed { outcome });
        Some(outcome)
    }

    fn player_context(&self) -> Result<ReactionContext, Rejection> {
        match self.pending {
            Some(context) if context.responder == Responder::Player => Ok(context),
            _ => Err(Rejection::NoReactionPending),
        }
    }

    fn ai_respond(state: &mut GameState, context: ReactionContext) -> ReactionOutcome {
        let team = state
            .battlefield
            .unit(context.defender)
            .map_or(Team::Enemy, |u| u.team);
        let defend = state.hands[team].first_of(CardKind::Defend);

        let should_defend = defend.is_some()
            && context.pending_damage > state.config.ai_defend_damage_threshold
            && state.reaction_roll() < state.config.ai_defend_chance;

        match defend {
            Some(id) if should_defend => {
                info!(defender = %context.defender, "AI plays Defend");
                let card = state.take_card(team, id);
                Self::play_defend(state, context.defender, team, card);
                Self::resolve(state, context, Some(BlockSource::DefendCard(id)))
            }
            _ => {
                debug!(defender = %context.defender, "AI takes the hit");
                Self::resolve(state, context, None)
            }
        }
    }

    fn play_defend(state: &mut GameState, defender: UnitId, team: Team, card: Card) {
        if let Some(unit) = state.battlefield.unit_mut(defender) {
            unit.flags.is_defending = true;
        }
        let actor = state.actor_label(defender);
        state.emit(SimEvent::CardPlayed {
            card: Some(card.id),
            kind: card.kind,
            actor,
        });
        state.record(
            team,
            Action::PlayCard {
                unit: defender,
                card: card.id,
                kind: card.kind,
            },
        );
        state.deck.discard(card);
    }

    /// Commit an attack. The damage path always runs; a block has already
    /// set the defending flag, which absorbs it.
    fn resolve(state: &mut GameState, context: ReactionContext, block: Option<BlockSource>) -> ReactionOutcome {
        let ReactionContext {
            attacker,
            defender,
            pending_damage,
            ..
        } = context;

        let outcome = match (block, state.apply_damage(defender, pending_damage)) {
            (Some(source), _) => ReactionOutcome::Blocked {
                attacker,
                defender,
                source,
            },
            (None, Some(DamageOutcome::Negated)) => ReactionOutcome::Blocked {
                attacker,
                defender,
                source: BlockSource::Stance,
            },
            (None, Some(DamageOutcome::Taken { amount, remaining })) => ReactionOutcome::DamageTaken {
                attacker,
                defender,
                amount,
                died: remaining == 0,
            },
            (None, None) => ReactionOutcome::Cancelled { attacker, defender },
        };

        if state.equipment.has_equipment(attacker, EquipmentKind::MekaLeg) {
            debug!(%attacker, "Meka Leg keeps the attack available");
        } else if let Some(unit) = state.battlefield.unit_mut(attacker) {
            unit.flags.has_attacked = true;
        }

        info!(?outcome, "attack resolved");
        state.emit(SimEvent::ReactionClosed { outcome });
        outcome
    }
}
