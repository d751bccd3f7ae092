//! Turn orchestrator.
//!
//! `Simulation` owns the world and every subsystem and is the only entry
//! point for the presentation layer. Input arrives as clicks and card
//! plays; time arrives through `tick`. Everything else is an outbound
//! `SimEvent`.
//!
//! ## Flow
//!
//! ```text
//! Setup ──start──> PlayerTurn ──end_player_turn──> EnemyTurn ──script done──> PlayerTurn ...
//!                                                                    end_game ──> GameOver
//! ```
//!
//! Movements and pending reactions are suspension points: while either is
//! active the simulation is busy and refuses new input, except answers to
//! the pending reaction.

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::enemy::{self, EnemyScript, EnemyStage};
use super::movement::{MovePurpose, MoveProgress, Movement};
use super::phase::{CardMode, Phase};
use crate::cards::{Card, CardKind, EquipmentKind};
use crate::core::{
    Action, ActionRecord, CardCensus, CardId, GameState, HighlightPurpose, Rejection, SimConfig, SimEvent, Team,
    UnitId,
};
use crate::equipment::EquipOutcome;
use crate::grid::{find_path, landing_tiles, reachable_tiles, Coord};
use crate::reaction::{ReactionContext, ReactionOutcome, ReactionProtocol, ReactionStatus};
use crate::units::UnitSpec;

/// Deferred start bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
struct StartRequest {
    requested: bool,
    presentation_ready: bool,
    retry_in: f32,
}

/// The complete skirmish.
#[derive(Clone, Debug)]
pub struct Simulation {
    state: GameState,
    reaction: ReactionProtocol,
    phase: Phase,
    selected: Option<UnitId>,
    card_mode: CardMode,
    movable: FxHashSet<Coord>,
    movement: Option<Movement>,
    enemy: Option<EnemyScript>,
    start: StartRequest,
}

impl Simulation {
    /// Create a simulation in the `Setup` phase.
    ///
    /// # Panics
    ///
    /// If the config is invalid.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: GameState::new(config),
            reaction: ReactionProtocol::new(),
            phase: Phase::Setup,
            selected: None,
            card_mode: CardMode::None,
            movable: FxHashSet::default(),
            movement: None,
            enemy: None,
            start: StartRequest::default(),
        }
    }

    // === Setup ===

    /// Place a unit.
    ///
    /// # Panics
    ///
    /// After the game has started, or if the cell is taken or off the grid.
    pub fn spawn_unit(&mut self, spec: UnitSpec, position: Coord) -> UnitId {
        assert_eq!(self.phase, Phase::Setup, "Units are placed before the game starts");
        self.state.battlefield.spawn(spec, position)
    }

    /// Deal the opening hands and begin the first player turn.
    ///
    /// # Panics
    ///
    /// If the game has already started.
    pub fn start(&mut self) {
        assert_eq!(self.phase, Phase::Setup, "Game already started");
        self.start.requested = false;

        let opening = self.state.config.initial_hand_size;
        for team in Team::ALL {
            self.state.draw_into(team, opening);
        }
        info!(
            player_units = self.state.battlefield.roster(Team::Player).len(),
            enemy_units = self.state.battlefield.roster(Team::Enemy).len(),
            draw_pile = self.state.deck.draw_count(),
            "game started"
        );
        self.begin_player_turn(false);
    }

    /// Start as soon as the presentation layer is ready, retrying on `tick`.
    pub fn request_start(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        if self.start.presentation_ready {
            self.start();
        } else {
            debug!("presentation layer not ready, start deferred");
            self.start.requested = true;
            self.start.retry_in = self.state.config.init_retry_delay;
        }
    }

    pub fn set_presentation_ready(&mut self, ready: bool) {
        self.start.presentation_ready = ready;
    }

    // === Time ===

    /// Advance timers by `dt` seconds: deferred start, movement, reaction
    /// countdown, then the enemy script.
    pub fn tick(&mut self, dt: f32) {
        self.tick_start(dt);

        if let Some(movement) = self.movement.as_mut() {
            let progress = movement.tick(&mut self.state, dt);
            if progress != MoveProgress::InProgress {
                if let Some(done) = self.movement.take() {
                    self.on_movement_finished(&done, progress);
                }
            }
        }

        if let Some(outcome) = self.reaction.tick(&mut self.state, dt) {
            self.after_reaction(outcome);
        }

        self.advance_enemy();
    }

    fn tick_start(&mut self, dt: f32) {
        if !self.start.requested || self.phase != Phase::Setup {
            return;
        }
        self.start.retry_in -= dt;
        if self.start.retry_in > 0.0 {
            return;
        }
        if self.start.presentation_ready {
            self.start();
        } else {
            debug!("presentation layer still not ready, retrying");
            self.start.retry_in = self.state.config.init_retry_delay;
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    #[must_use]
    pub fn card_mode(&self) -> &CardMode {
        &self.card_mode
    }

    /// Tiles the selected unit may move to.
    #[must_use]
    pub fn movable_tiles(&self) -> &FxHashSet<Coord> {
        &self.movable
    }

    #[must_use]
    pub fn pending_reaction(&self) -> Option<&ReactionContext> {
        self.reaction.context()
    }

    /// A movement or a reaction is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.movement.is_some() || self.reaction.is_pending()
    }

    #[must_use]
    pub fn is_roster_empty(&self, team: Team) -> bool {
        self.state.battlefield.is_roster_empty(team)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for scenario setup and tooling.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }

    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        self.state.history()
    }

    /// Most recent card play, counting Protection Gem auto-defends.
    #[must_use]
    pub fn last_card_played(&self) -> Option<&ActionRecord> {
        self.state
            .history()
            .iter()
            .rev()
            .find(|r| matches!(r.action, Action::PlayCard { .. } | Action::AutoDefend { .. }))
    }

    #[must_use]
    pub fn card_census(&self) -> CardCensus {
        self.state.census()
    }

    /// Stop the game. Called by the owner once a roster is empty.
    pub fn end_game(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        if let Some(outcome) = self.reaction.cancel(&mut self.state) {
            debug!(?outcome, "reaction dropped at game over");
        }
        if let Some(movement) = self.movement.take() {
            debug!(unit = %movement.unit(), remaining = movement.remaining(), "movement dropped at game over");
            if let Some(unit) = self.state.battlefield.unit_mut(movement.unit()) {
                unit.flags.is_moving = false;
            }
        }
        self.enemy = None;
        self.card_mode = CardMode::None;
        self.set_phase(Phase::GameOver);
    }

    // === Player input ===

    /// A unit was clicked. Own units are selected; enemy units count as a
    /// click on their cell.
    pub fn on_unit_clicked(&mut self, unit: UnitId) -> Result<(), Rejection> {
        self.ensure_player_input()?;
        let clicked = self.state.battlefield.unit(unit).ok_or(Rejection::UnknownUnit(unit))?;

        if clicked.team == Team::Player {
            self.select_unit(unit)
        } else {
            let position = clicked.position();
            self.on_cell_clicked(position)
        }
    }

    /// Select an own unit, dropping any card mode.
    pub fn select_unit(&mut self, unit: UnitId) -> Result<(), Rejection> {
        self.ensure_player_input()?;
        let chosen = self.state.battlefield.unit(unit).ok_or(Rejection::UnknownUnit(unit))?;
        if chosen.team != Team::Player {
            return Err(Rejection::NotOwnUnit(unit));
        }

        let (origin, range, can_move) = (chosen.position(), chosen.stats.move_range, chosen.can_move());
        debug!(%unit, can_move, "unit selected");

        self.selected = Some(unit);
        self.card_mode = CardMode::None;
        self.state.emit(SimEvent::UnitSelected { unit: Some(unit) });
        self.state.emit(SimEvent::HighlightsCleared);

        self.movable = if can_move {
            reachable_tiles(self.state.battlefield.grid(), origin, range)
        } else {
            FxHashSet::default()
        };
        if !self.movable.is_empty() {
            let cells: Vec<Coord> = self.movable.iter().copied().collect();
            self.highlight(cells, HighlightPurpose::Movable);
        }
        Ok(())
    }

    /// Drop the selection and any card mode.
    pub fn deselect(&mut self) -> Result<(), Rejection> {
        if self.movement.is_some() {
            return Err(Rejection::Busy);
        }
        self.clear_selection();
        Ok(())
    }

    /// Leave the current card mode. Held-back cards stay in hand.
    pub fn cancel_card_mode(&mut self) -> Result<(), Rejection> {
        if self.movement.is_some() {
            return Err(Rejection::Busy);
        }
        if self.card_mode.is_none() {
            return Ok(());
        }
        debug!(card = ?self.card_mode.pending_card(), "card mode cancelled, card stays in hand");
        self.card_mode = CardMode::None;
        self.state.emit(SimEvent::HighlightsCleared);

        if !self.movable.is_empty() {
            let cells: Vec<Coord> = self.movable.iter().copied().collect();
            self.highlight(cells, HighlightPurpose::Movable);
        }
        Ok(())
    }

    /// A cell was clicked. What it means depends on the card mode.
    pub fn on_cell_clicked(&mut self, coord: Coord) -> Result<(), Rejection> {
        self.ensure_player_input()?;
        if !self.state.battlefield.grid().contains(coord) {
            return Err(Rejection::OutOfBounds(coord));
        }

        let result = match self.card_mode.clone() {
            CardMode::None => self.click_without_card(coord),
            CardMode::Attack { card } => self.click_attack_target(card, coord),
            CardMode::ChargeMove { card, landings } => self.click_charge_landing(card, &landings, coord),
            CardMode::ChargeStrike { targets } => self.click_charge_target(&targets, coord),
            CardMode::EquipSlot { .. } => Err(Rejection::WrongCardMode),
        };
        if let Err(rejection) = &result {
            debug!(%coord, %rejection, "click rejected");
        }
        result
    }

    /// Play a card from the player's hand for the selected unit.
    ///
    /// Attack and Charge enter a card mode and wait for a target; the card
    /// stays in hand until then.
    ///
    /// # Panics
    ///
    /// If the card is not in the player's hand.
    pub fn play_card(&mut self, card: CardId) -> Result<(), Rejection> {
        self.ensure_player_input()?;
        let unit = self.selected.ok_or(Rejection::NoSelection)?;
        let kind = self.state.hands[Team::Player]
            .get(card)
            .map(|c| c.kind)
            .unwrap_or_else(|| panic!("{} is not in the acting hand", card));
        let (origin, range) = self
            .state
            .battlefield
            .unit(unit)
            .map(|u| (u.position(), u.stats.attack_range))
            .ok_or(Rejection::UnknownUnit(unit))?;

        debug!(%unit, %card, kind = kind.name(), "card play");
        match kind {
            CardKind::Attack => {
                if !self.may_attack(unit) {
                    return Err(Rejection::AlreadyAttacked(unit));
                }
                let targets: Vec<Coord> = self
                    .state
                    .battlefield
                    .positions_of(Team::Enemy)
                    .into_iter()
                    .filter(|c| c.manhattan(origin) <= range)
                    .collect();
                self.enter_card_mode(CardMode::Attack { card });
                self.highlight(targets, HighlightPurpose::Attackable);
            }
            CardKind::Defend => {
                let played = self.take_and_announce(Team::Player, unit, card);
                if let Some(defender) = self.state.battlefield.unit_mut(unit) {
                    defender.flags.is_defending = true;
                }
                self.state.deck.discard(played);
                self.enter_card_mode(CardMode::None);
            }
            CardKind::Medicine => {
                let played = self.take_and_announce(Team::Player, unit, card);
                self.state.heal(unit, self.state.config.medicine_heal);
                self.state.deck.discard(played);
                self.enter_card_mode(CardMode::None);
            }
            CardKind::Charge => {
                let enemies = self.state.battlefield.positions_of(Team::Enemy);
                let landings = landing_tiles(
                    self.state.battlefield.grid(),
                    origin,
                    self.state.config.charge_radius,
                    &enemies,
                );
                if landings.is_empty() {
                    return Err(Rejection::NoChargeLanding);
                }
                let cells: Vec<Coord> = landings.iter().copied().collect();
                self.enter_card_mode(CardMode::ChargeMove { card, landings });
                self.highlight(cells, HighlightPurpose::Chargeable);
            }
            CardKind::Equipment { .. } => {
                if self.state.equipment.is_full(unit) {
                    self.enter_card_mode(CardMode::EquipSlot { card });
                    self.state.emit(SimEvent::EquipmentSlotChoiceRequired {
                        unit,
                        card,
                        slots: self.state.equipment.capacity(),
                    });
                } else {
                    self.equip_from_hand(unit, card);
                    self.enter_card_mode(CardMode::None);
                }
            }
        }
        Ok(())
    }

    /// Replace equipment slot `slot` with the card held in `EquipSlot` mode.
    pub fn choose_equipment_slot(&mut self, slot: usize) -> Result<(), Rejection> {
        self.ensure_player_input()?;
        let CardMode::EquipSlot { card } = self.card_mode else {
            return Err(Rejection::WrongCardMode);
        };
        let unit = self.selected.ok_or(Rejection::NoSelection)?;

        let filled = self.state.equipment.equipment_of(unit).len();
        if slot >= filled {
            return Err(Rejection::InvalidSlot { slot, filled });
        }

        let new_card = self.state.take_card(Team::Player, card);
        let kind = new_card.kind;
        match self.state.equipment.replace(unit, slot, new_card, &mut self.state.deck) {
            Ok(discarded) => {
                self.announce(Team::Player, unit, card, kind);
                self.state.record(Team::Player, Action::Equip { unit, card, slot });
                info!(%unit, slot, %discarded, "equipment replaced");
                self.emit_equipment(unit);
                self.enter_card_mode(CardMode::None);
                Ok(())
            }
            Err(error) => {
                let (rejection, card) = error.into_parts();
                if let Err(card) = self.state.hands[Team::Player].try_add(card) {
                    self.state.deck.discard(card);
                }
                Err(rejection)
            }
        }
    }

    /// End the player's turn. Drops any pending reaction and card mode.
    pub fn end_player_turn(&mut self) -> Result<(), Rejection> {
        if self.phase != Phase::PlayerTurn {
            return Err(Rejection::WrongPhase);
        }
        if self.movement.is_some() {
            return Err(Rejection::Busy);
        }

        if let Some(outcome) = self.reaction.cancel(&mut self.state) {
            self.after_reaction(outcome);
        }
        self.clear_selection();
        self.state.record(Team::Player, Action::EndTurn);
        self.begin_enemy_turn();
        Ok(())
    }

    /// Answer the pending attack with a Defend card.
    pub fn respond_to_reaction(&mut self, card: CardId) -> Result<(), Rejection> {
        let outcome = self.reaction.respond_with_defend(&mut self.state, card)?;
        self.after_reaction(outcome);
        self.advance_enemy();
        Ok(())
    }

    /// Take the pending hit without waiting for the window to close.
    pub fn decline_reaction(&mut self) -> Result<(), Rejection> {
        let outcome = self.reaction.decline(&mut self.state)?;
        self.after_reaction(outcome);
        self.advance_enemy();
        Ok(())
    }

    // === Clicks per card mode ===

    fn click_without_card(&mut self, coord: Coord) -> Result<(), Rejection> {
        if let Some(occupant) = self.state.battlefield.unit_at(coord) {
            return if occupant.team == Team::Player {
                let id = occupant.id;
                self.select_unit(id)
            } else {
                Err(Rejection::WrongCardMode)
            };
        }

        let unit = self.selected.ok_or(Rejection::NoSelection)?;
        let mover = self.state.battlefield.unit(unit).ok_or(Rejection::UnknownUnit(unit))?;
        if !mover.can_move() {
            return Err(Rejection::AlreadyMoved(unit));
        }
        if !self.movable.contains(&coord) {
            return Err(Rejection::NotReachable(coord));
        }
        let from = mover.position();
        let path = find_path(self.state.battlefield.grid(), from, coord).ok_or(Rejection::NoPath(coord))?;

        self.state.record(Team::Player, Action::Move { unit, from, to: coord });
        self.movable.clear();
        self.state.emit(SimEvent::HighlightsCleared);
        self.movement = Some(Movement::start(&mut self.state, unit, path, MovePurpose::Plain));
        Ok(())
    }

    fn click_attack_target(&mut self, card: CardId, coord: Coord) -> Result<(), Rejection> {
        let attacker = self.selected.ok_or(Rejection::NoSelection)?;
        let unit = self.state.battlefield.unit(attacker).ok_or(Rejection::UnknownUnit(attacker))?;
        let (origin, range) = (unit.position(), unit.stats.attack_range);

        let defender = self
            .state
            .battlefield
            .unit_at(coord)
            .filter(|u| u.team == Team::Enemy)
            .map(|u| u.id)
            .ok_or(Rejection::NotAnEnemy(coord))?;
        let distance = origin.manhattan(coord);
        if distance > range {
            return Err(Rejection::OutOfRange {
                target: coord,
                distance,
                range,
            });
        }
        if !self.may_attack(attacker) {
            return Err(Rejection::AlreadyAttacked(attacker));
        }

        let played = self.take_and_announce(Team::Player, attacker, card);
        self.state.deck.discard(played);
        self.enter_card_mode(CardMode::None);
        self.launch_attack(Team::Player, attacker, defender)
    }

    fn click_charge_landing(
        &mut self,
        card: CardId,
        landings: &FxHashSet<Coord>,
        coord: Coord,
    ) -> Result<(), Rejection> {
        if !landings.contains(&coord) {
            return Err(Rejection::NotReachable(coord));
        }
        let unit = self.selected.ok_or(Rejection::NoSelection)?;
        let from = self
            .state
            .battlefield
            .unit(unit)
            .map(|u| u.position())
            .ok_or(Rejection::UnknownUnit(unit))?;
        let path = find_path(self.state.battlefield.grid(), from, coord).ok_or(Rejection::NoPath(coord))?;

        let played = self.take_and_announce(Team::Player, unit, card);
        self.state.deck.discard(played);
        self.state.record(Team::Player, Action::Move { unit, from, to: coord });
        self.movable.clear();
        self.enter_card_mode(CardMode::None);
        self.movement = Some(Movement::start(&mut self.state, unit, path, MovePurpose::PlayerCharge));
        Ok(())
    }

    fn click_charge_target(&mut self, targets: &[UnitId], coord: Coord) -> Result<(), Rejection> {
        let unit = self.selected.ok_or(Rejection::NoSelection)?;
        let target = self
            .state
            .battlefield
            .unit_at(coord)
            .map(|u| u.id)
            .filter(|id| targets.contains(id))
            .ok_or(Rejection::NotAnEnemy(coord))?;

        self.enter_card_mode(CardMode::None);
        self.charge_strike(Team::Player, unit, target);
        Ok(())
    }

    // === Shared actions ===

    fn ensure_player_input(&self) -> Result<(), Rejection> {
        if self.phase != Phase::PlayerTurn {
            return Err(Rejection::WrongPhase);
        }
        if self.is_busy() {
            return Err(Rejection::Busy);
        }
        Ok(())
    }

    /// Attack gate: not yet attacked, or wearing a Meka Leg.
    fn may_attack(&self, unit: UnitId) -> bool {
        self.state.battlefield.unit(unit).is_some_and(|u| u.can_attack())
            || self.state.equipment.has_equipment(unit, EquipmentKind::MekaLeg)
    }

    fn take_and_announce(&mut self, team: Team, unit: UnitId, card: CardId) -> Card {
        let played = self.state.take_card(team, card);
        self.announce(team, unit, played.id, played.kind);
        played
    }

    fn announce(&mut self, team: Team, unit: UnitId, card: CardId, kind: CardKind) {
        let actor = self.state.actor_label(unit);
        self.state.emit(SimEvent::CardPlayed {
            card: Some(card),
            kind,
            actor,
        });
        self.state.record(team, Action::PlayCard { unit, card, kind });
    }

    fn equip_from_hand(&mut self, unit: UnitId, card: CardId) {
        let team = self
            .state
            .battlefield
            .unit(unit)
            .map_or(Team::Player, |u| u.team);
        let played = self.take_and_announce(team, unit, card);

        match self.state.equipment.equip(unit, team, played, &mut self.state.deck) {
            EquipOutcome::Equipped { slot } | EquipOutcome::Replaced { slot, .. } => {
                self.state.record(team, Action::Equip { unit, card, slot });
                self.emit_equipment(unit);
            }
            EquipOutcome::SlotChoiceRequired(card) => {
                warn!(%unit, card = %card.id, "loadout filled up, returning card to hand");
                if let Err(card) = self.state.hands[team].try_add(card) {
                    self.state.deck.discard(card);
                }
            }
        }
    }

    fn emit_equipment(&mut self, unit: UnitId) {
        let equipped = self.state.equipment.equipment_of(unit).iter().map(|c| c.id).collect();
        self.state.emit(SimEvent::EquipmentChanged { unit, equipped });
    }

    /// Hand an attack to the reaction protocol.
    fn launch_attack(&mut self, team: Team, attacker: UnitId, defender: UnitId) -> Result<(), Rejection> {
        let damage = self
            .state
            .battlefield
            .unit(attacker)
            .map(|u| u.stats.attack_power)
            .ok_or(Rejection::UnknownUnit(attacker))?;

        self.state.record(team, Action::Attack {
            attacker,
            defender,
            damage,
        });
        if let ReactionStatus::Resolved(outcome) = self.reaction.initiate(&mut self.state, attacker, defender, damage)? {
            self.after_reaction(outcome);
        }
        Ok(())
    }

    /// Flat Charge damage. Does not spend the unit's attack.
    fn charge_strike(&mut self, team: Team, unit: UnitId, target: UnitId) {
        let damage = self.state.config.charge_damage;
        info!(%unit, %target, damage, "charge strike");
        self.state.record(team, Action::ChargeStrike { unit, target, damage });
        self.state.apply_damage(target, damage);
        self.sync_selection();
    }

    fn after_reaction(&mut self, outcome: ReactionOutcome) {
        debug!(?outcome, "reaction settled");
        self.sync_selection();
    }

    fn on_movement_finished(&mut self, movement: &Movement, progress: MoveProgress) {
        let unit = movement.unit();
        debug!(%unit, ?progress, purpose = ?movement.purpose(), "movement done");

        if movement.purpose() != MovePurpose::PlayerCharge || self.phase != Phase::PlayerTurn {
            return;
        }
        let Some(position) = self.state.battlefield.unit(unit).map(|u| u.position()) else {
            return;
        };
        let targets: Vec<UnitId> = self
            .state
            .battlefield
            .roster(Team::Enemy)
            .iter()
            .copied()
            .filter(|&id| {
                self.state
                    .battlefield
                    .unit(id)
                    .is_some_and(|u| u.position().is_adjacent(position))
            })
            .collect();

        if targets.is_empty() {
            debug!(%unit, "no enemy next to the charge landing");
            return;
        }
        let cells: Vec<Coord> = targets
            .iter()
            .filter_map(|&id| self.state.battlefield.unit(id).map(|u| u.position()))
            .collect();
        self.card_mode = CardMode::ChargeStrike { targets };
        self.highlight(cells, HighlightPurpose::Attackable);
    }

    // === Selection and highlights ===

    fn enter_card_mode(&mut self, mode: CardMode) {
        self.card_mode = mode;
        self.state.emit(SimEvent::HighlightsCleared);
    }

    fn highlight(&mut self, mut cells: Vec<Coord>, purpose: HighlightPurpose) {
        cells.sort_unstable();
        self.state.emit(SimEvent::HighlightSet { cells, purpose });
    }

    fn clear_selection(&mut self) {
        self.card_mode = CardMode::None;
        self.movable.clear();
        if self.selected.take().is_some() {
            self.state.emit(SimEvent::UnitSelected { unit: None });
        }
        self.state.emit(SimEvent::HighlightsCleared);
    }

    /// Drop the selection if the selected unit has died.
    fn sync_selection(&mut self) {
        if let Some(unit) = self.selected {
            if !self.state.battlefield.unit(unit).is_some_and(|u| u.is_alive()) {
                debug!(%unit, "selected unit is gone");
                self.clear_selection();
            }
        }
    }

    // === Phases ===

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        info!(%phase, turn = self.state.turn_number, "phase changed");
        self.state.emit(SimEvent::PhaseChanged {
            phase,
            turn: self.state.turn_number,
        });
    }

    fn begin_player_turn(&mut self, draw: bool) {
        self.enemy = None;
        self.state.begin_turn(Team::Player);
        self.state.battlefield.reset_team(Team::Player);
        self.set_phase(Phase::PlayerTurn);
        if draw {
            self.state.draw_into(Team::Player, self.state.config.cards_per_turn);
        }
    }

    fn begin_enemy_turn(&mut self) {
        self.state.begin_turn(Team::Enemy);
        self.state.battlefield.reset_team(Team::Enemy);
        self.set_phase(Phase::EnemyTurn);
        self.state.draw_into(Team::Enemy, self.state.config.cards_per_turn);

        self.enemy = Some(EnemyScript::new(self.state.battlefield.roster(Team::Enemy)));
        self.advance_enemy();
    }

    /// Run the enemy script until it suspends or every unit is done.
    fn advance_enemy(&mut self) {
        while self.phase == Phase::EnemyTurn && !self.is_busy() {
            let Some(script) = &self.enemy else {
                return;
            };
            if script.is_finished() {
                info!(turn = self.state.turn_number, "enemy turn finished");
                self.begin_player_turn(true);
                return;
            }
            let Some((unit, stage)) = script.current() else {
                return;
            };

            if self.state.battlefield.unit(unit).is_none() || stage == EnemyStage::Done {
                if let Some(script) = self.enemy.as_mut() {
                    script.next_unit();
                }
                continue;
            }

            let next = match stage {
                EnemyStage::Opening => self.enemy_opening(unit),
                EnemyStage::ChargeStrike { target } => {
                    if let Some(victim) = enemy::charge_strike_target(&self.state, unit, target) {
                        self.charge_strike(Team::Enemy, unit, victim);
                    }
                    EnemyStage::Approach
                }
                EnemyStage::Approach => {
                    self.enemy_approach(unit);
                    EnemyStage::Attack
                }
                EnemyStage::Attack => {
                    self.enemy_attack(unit);
                    EnemyStage::Equip
                }
                EnemyStage::Equip => {
                    if let Some(card) = enemy::plan_equip(&self.state, unit) {
                        self.equip_from_hand(unit, card);
                    }
                    EnemyStage::Done
                }
                EnemyStage::Done => EnemyStage::Done,
            };
            if let Some(script) = self.enemy.as_mut() {
                script.set_stage(next);
            }
        }
    }

    fn enemy_opening(&mut self, unit: UnitId) -> EnemyStage {
        let Some(target) = self.state.battlefield.nearest_opponent(unit) else {
            return EnemyStage::Done;
        };

        let support = enemy::plan_support(&self.state, unit);
        if let Some(card) = support.defend {
            let played = self.take_and_announce(Team::Enemy, unit, card);
            if let Some(me) = self.state.battlefield.unit_mut(unit) {
                me.flags.is_defending = true;
            }
            self.state.deck.discard(played);
        }
        if let Some(card) = support.medicine {
            let played = self.take_and_announce(Team::Enemy, unit, card);
            self.state.heal(unit, self.state.config.medicine_heal);
            self.state.deck.discard(played);
        }
        if support.defend.is_some() || support.medicine.is_some() {
            return EnemyStage::Approach;
        }

        let Some(plan) = enemy::plan_charge(&self.state, unit, target) else {
            return EnemyStage::Approach;
        };
        let played = self.take_and_announce(Team::Enemy, unit, plan.card);
        self.state.deck.discard(played);
        if let (Some(&from), Some(&to)) = (plan.path.first(), plan.path.last()) {
            self.state.record(Team::Enemy, Action::Move { unit, from, to });
        }
        self.movement = Some(Movement::start(&mut self.state, unit, plan.path, MovePurpose::EnemyCharge));
        EnemyStage::ChargeStrike { target }
    }

    fn enemy_approach(&mut self, unit: UnitId) {
        let Some(target) = self.state.battlefield.nearest_opponent(unit) else {
            return;
        };
        let Some(path) = enemy::plan_approach(&self.state, unit, target) else {
            return;
        };
        if let (Some(&from), Some(&to)) = (path.first(), path.last()) {
            self.state.record(Team::Enemy, Action::Move { unit, from, to });
        }
        self.movement = Some(Movement::start(&mut self.state, unit, path, MovePurpose::Plain));
    }

    fn enemy_attack(&mut self, unit: UnitId) {
        let Some(target) = self.state.battlefield.nearest_opponent(unit) else {
            return;
        };
        let Some(card) = enemy::plan_attack(&self.state, unit, target) else {
            return;
        };
        let played = self.take_and_announce(Team::Enemy, unit, card);
        self.state.deck.discard(played);
        if let Err(rejection) = self.launch_attack(Team::Enemy, unit, target) {
            warn!(%unit, %rejection, "enemy attack refused");
        }
    }
}
