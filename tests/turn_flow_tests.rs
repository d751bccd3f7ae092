//! Turn orchestration tests.
//!
//! These tests verify:
//! - Attacks and Charges resolve through the public click API
//! - The enemy AI keeps its decision order
//! - Phases alternate and cards are conserved over whole games
//! - The damage floor and the one-shot defending flag

use dino_tactics::{
    Action, Battlefield, CardId, CardKind, Coord, DamageOutcome, DeckComposition, Grid, Hand, Phase, Responder,
    SimConfig, SimEvent, Simulation, Stats, Team, UnitSpec,
};
use proptest::prelude::*;

fn base_deck(attack: usize, defend: usize, medicine: usize, charge: usize) -> DeckComposition {
    DeckComposition {
        attack,
        defend,
        medicine,
        charge,
        meka_leg: 0,
        protection_gem: 0,
    }
}

/// Instant movement, empty opening hands.
fn quick(deck: DeckComposition) -> SimConfig {
    SimConfig::default()
        .with_deck(deck)
        .with_move_step_seconds(0.0)
        .with_initial_hand_size(0)
        .with_seed(11)
}

/// Pull a card of `kind` out of the deck into `team`'s hand.
fn give(sim: &mut Simulation, team: Team, kind: CardKind) -> CardId {
    let state = sim.state_mut();
    let mut scratch = Hand::new(100);
    let id = loop {
        let drawn = state.deck.draw(1, &mut scratch);
        let id = *drawn.first().expect("deck ran out");
        if scratch.get(id).is_some_and(|c| c.kind.same_kind(kind)) {
            break id;
        }
    };
    let card = scratch.take(id);
    state.deck.discard_all(scratch.drain());
    state.hands[team].try_add(card).unwrap();
    id
}

fn health(sim: &Simulation, unit: dino_tactics::UnitId) -> i32 {
    sim.state().battlefield.unit(unit).unwrap().stats.current_health
}

/// Enemy actions recorded so far, in order.
fn enemy_actions(sim: &Simulation) -> Vec<Action> {
    sim.history()
        .iter()
        .filter(|r| r.team == Team::Enemy)
        .map(|r| r.action.clone())
        .collect()
}

#[test]
fn test_attack_twenty_against_defense_five() {
    let mut sim = Simulation::new(quick(base_deck(10, 0, 0, 0)));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(3, 3));
    let raptor = sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(4, 3));
    sim.start();

    let card = give(&mut sim, Team::Player, CardKind::Attack);
    sim.on_unit_clicked(rex).unwrap();
    sim.play_card(card).unwrap();
    sim.on_cell_clicked(Coord::new(4, 3)).unwrap();
    sim.tick(1.0);

    assert_eq!(health(&sim, raptor), 85);
    let damaged: Vec<i32> = sim
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SimEvent::UnitDamaged { unit, amount, .. } if unit == raptor => Some(amount),
            _ => None,
        })
        .collect();
    assert_eq!(damaged, vec![15]);
}

#[test]
fn test_charge_then_attack_same_turn() {
    let mut sim = Simulation::new(quick(base_deck(10, 0, 0, 10)));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
    let raptor = sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(0, 5));
    sim.start();
    let charge = give(&mut sim, Team::Player, CardKind::Charge);
    let attack = give(&mut sim, Team::Player, CardKind::Attack);

    sim.select_unit(rex).unwrap();
    sim.play_card(charge).unwrap();
    sim.on_cell_clicked(Coord::new(0, 4)).unwrap();
    sim.tick(0.0);
    sim.on_cell_clicked(Coord::new(0, 5)).unwrap();
    assert_eq!(health(&sim, raptor), 95);

    let flags = sim.state().battlefield.unit(rex).unwrap().flags;
    assert!(flags.has_moved);
    assert!(!flags.has_attacked);

    sim.play_card(attack).unwrap();
    sim.on_cell_clicked(Coord::new(0, 5)).unwrap();
    sim.tick(1.0);

    assert_eq!(health(&sim, raptor), 80);
    assert!(sim.state().battlefield.unit(rex).unwrap().flags.has_attacked);
}

#[test]
fn test_ending_turn_cancels_own_attack() {
    let mut sim = Simulation::new(quick(base_deck(10, 0, 0, 0)));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
    let raptor = sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(0, 1));
    sim.start();
    let card = give(&mut sim, Team::Player, CardKind::Attack);
    give(&mut sim, Team::Enemy, CardKind::Attack);

    sim.select_unit(rex).unwrap();
    sim.play_card(card).unwrap();
    sim.on_cell_clicked(Coord::new(0, 1)).unwrap();
    assert_eq!(sim.pending_reaction().map(|p| p.responder), Some(Responder::Ai));

    sim.end_player_turn().unwrap();
    assert_eq!(health(&sim, raptor), 100);
    assert!(sim.drain_events().iter().any(|e| matches!(
        e,
        SimEvent::ReactionClosed { outcome: dino_tactics::ReactionOutcome::Cancelled { .. } }
    )));

    // The enemy answers straight away and the player gets the window.
    let pending = sim.pending_reaction().copied().unwrap();
    assert_eq!((pending.attacker, pending.defender), (raptor, rex));
    assert_eq!(pending.responder, Responder::Player);
}

#[test]
fn test_hurt_enemy_defends_then_heals_without_charging() {
    let mut sim = Simulation::new(quick(base_deck(0, 5, 5, 5)));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
    let raptor = sim.spawn_unit(
        UnitSpec::new("Raptor", Team::Enemy).with_stats(Stats::default().with_current_health(30)),
        Coord::new(0, 4),
    );
    sim.start();
    give(&mut sim, Team::Enemy, CardKind::Charge);
    give(&mut sim, Team::Enemy, CardKind::Defend);
    give(&mut sim, Team::Enemy, CardKind::Medicine);

    sim.end_player_turn().unwrap();
    sim.tick(0.0);
    assert_eq!(sim.phase(), Phase::PlayerTurn);

    let kinds: Vec<CardKind> = enemy_actions(&sim)
        .iter()
        .filter_map(|a| a.played_card().map(|(_, kind)| kind))
        .collect();
    assert_eq!(kinds, vec![CardKind::Defend, CardKind::Medicine]);
    assert!(matches!(enemy_actions(&sim).last(), Some(Action::Move { .. })));

    let me = sim.state().battlefield.unit(raptor).unwrap();
    assert_eq!(me.stats.current_health, 40);
    assert!(me.flags.is_defending);
    assert_eq!(me.position(), Coord::new(0, 1));
    assert_eq!(health(&sim, rex), 100);
}

#[test]
fn test_healthy_enemy_charges_in() {
    let mut sim = Simulation::new(quick(base_deck(0, 0, 0, 10)));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
    let raptor = sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(0, 4));
    sim.start();
    give(&mut sim, Team::Enemy, CardKind::Charge);

    sim.end_player_turn().unwrap();
    assert!(sim.is_busy(), "charge movement suspends the script");
    sim.tick(0.0);

    let actions = enemy_actions(&sim);
    assert!(matches!(actions[0], Action::PlayCard { kind: CardKind::Charge, .. }));
    assert!(matches!(actions[1], Action::Move { .. }));
    assert!(matches!(actions[2], Action::ChargeStrike { target, damage: 10, .. } if target == rex));
    assert_eq!(actions.len(), 3);

    let landing = sim.state().battlefield.unit(raptor).unwrap().position();
    assert!(landing.is_adjacent(Coord::new(0, 0)));
    assert_eq!(health(&sim, rex), 95);
    assert_eq!(sim.phase(), Phase::PlayerTurn);
}

#[test]
fn test_enemy_equips_after_attacking() {
    let mut sim = Simulation::new(quick(DeckComposition {
        meka_leg: 2,
        ..base_deck(10, 0, 0, 0)
    }));
    let rex = sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(0, 0));
    let raptor = sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(0, 1));
    sim.start();
    give(&mut sim, Team::Enemy, CardKind::Attack);
    give(&mut sim, Team::Enemy, CardKind::equipment(dino_tactics::EquipmentKind::MekaLeg));

    sim.end_player_turn().unwrap();
    assert!(sim.pending_reaction().is_some());
    assert!(sim.state().equipment.equipment_of(raptor).is_empty());

    sim.decline_reaction().unwrap();
    assert_eq!(health(&sim, rex), 85);
    assert!(sim
        .state()
        .equipment
        .has_equipment(raptor, dino_tactics::EquipmentKind::MekaLeg));
    assert!(matches!(enemy_actions(&sim).last(), Some(Action::Equip { slot: 0, .. })));
}

/// Scripted passive player: end every turn, take every hit.
fn run_passive(sim: &mut Simulation, turns: u32, mut check: impl FnMut(&Simulation)) {
    for _ in 0..5_000 {
        if sim.state().turn_number >= turns || sim.phase() == Phase::GameOver {
            return;
        }
        if Team::ALL.into_iter().any(|team| sim.is_roster_empty(team)) {
            sim.end_game();
            return;
        }
        match sim.phase() {
            Phase::PlayerTurn => sim.end_player_turn().unwrap(),
            Phase::EnemyTurn => match sim.pending_reaction().map(|p| p.responder) {
                Some(Responder::Player) => sim.decline_reaction().unwrap(),
                _ => sim.tick(0.25),
            },
            Phase::Setup | Phase::GameOver => unreachable!(),
        }
        check(sim);
    }
    panic!("game did not progress");
}

#[test]
fn test_phases_alternate_and_cards_are_conserved() {
    for seed in 0..6 {
        let mut sim = Simulation::new(SimConfig::default().with_seed(seed));
        sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(2, 1));
        sim.spawn_unit(UnitSpec::new("Stego", Team::Player), Coord::new(6, 1));
        sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(3, 9));
        sim.spawn_unit(UnitSpec::new("Spino", Team::Enemy), Coord::new(8, 9));
        sim.start();

        let mut phases = Vec::new();
        run_passive(&mut sim, 16, |sim| {
            assert_eq!(sim.card_census().total(), 46, "seed {seed}");
            for team in Team::ALL {
                assert!(sim.state().hands[team].len() <= 10);
            }
        });
        phases.extend(sim.drain_events().into_iter().filter_map(|e| match e {
            SimEvent::PhaseChanged { phase, turn } => Some((phase, turn)),
            _ => None,
        }));

        let playing: Vec<_> = phases.iter().filter(|(p, _)| *p != Phase::GameOver).collect();
        assert_eq!(playing.first().map(|(p, t)| (*p, *t)), Some((Phase::PlayerTurn, 1)));
        for pair in playing.windows(2) {
            assert_ne!(pair[0].0, pair[1].0, "seed {seed}: {pair:?}");
            assert_eq!(pair[0].1 + 1, pair[1].1, "seed {seed}: {pair:?}");
        }
    }
}

#[test]
fn test_passive_player_is_worn_down() {
    let mut sim = Simulation::new(
        SimConfig::default()
            .with_deck(base_deck(30, 0, 0, 0))
            .with_seed(3),
    );
    let rex = sim.spawn_unit(
        UnitSpec::new("T-Rex", Team::Player).with_stats(Stats::default().with_current_health(20)),
        Coord::new(0, 0),
    );
    sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(0, 6));
    sim.start();

    run_passive(&mut sim, 40, |_| {});

    assert!(sim.is_roster_empty(Team::Player));
    assert!(sim.state().battlefield.unit(rex).is_none());
    assert_eq!(sim.phase(), Phase::GameOver);
    assert_eq!(sim.card_census().total(), 30);

    let attacks = enemy_actions(&sim)
        .iter()
        .filter(|a| matches!(a, Action::Attack { .. }))
        .count();
    assert_eq!(attacks, 2);
}

proptest! {
    #[test]
    fn test_damage_floor(incoming in 0i32..200, defense in 0i32..200) {
        let mut field = Battlefield::new(Grid::new(2, 2));
        let id = field.spawn(
            UnitSpec::new("Ankylo", Team::Player).with_stats(Stats::new(1000, 20, defense, 3, 1)),
            Coord::new(0, 0),
        );
        let unit = field.unit_mut(id).unwrap();

        let lost = unit.take_damage(incoming).amount();
        prop_assert_eq!(lost, (incoming - defense).max(1));
        prop_assert_eq!(unit.stats.current_health, 1000 - lost);
    }

    #[test]
    fn test_defending_absorbs_exactly_one_hit(hits in prop::collection::vec(1i32..60, 1..6)) {
        let mut field = Battlefield::new(Grid::new(2, 2));
        let id = field.spawn(UnitSpec::new("Ankylo", Team::Player), Coord::new(0, 0));
        let unit = field.unit_mut(id).unwrap();
        unit.flags.is_defending = true;
        unit.reset_turn();

        let outcomes: Vec<DamageOutcome> = hits.iter().map(|&hit| unit.take_damage(hit)).collect();
        prop_assert_eq!(outcomes[0], DamageOutcome::Negated);
        prop_assert!(
            outcomes[1..].iter().all(|o| matches!(o, DamageOutcome::Taken { .. })),
            "hits after the absorbed one deal damage: {:?}",
            outcomes
        );
        prop_assert!(!unit.flags.is_defending);
    }
}

#[test]
fn test_three_against_ten_deals_one() {
    let mut field = Battlefield::new(Grid::new(2, 2));
    let id = field.spawn(
        UnitSpec::new("Ankylo", Team::Player).with_stats(Stats::new(1000, 3, 10, 3, 1)),
        Coord::new(0, 0),
    );
    assert_eq!(field.unit_mut(id).unwrap().take_damage(3).amount(), 1);
}
