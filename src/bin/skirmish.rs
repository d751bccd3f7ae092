//! Headless skirmish.
//!
//! Plays a full game with a simple scripted player against the built-in
//! enemy AI and logs it through `tracing`. Usage:
//!
//! ```text
//! RUST_LOG=dino_tactics=debug skirmish [seed]
//! ```

use dino_tactics::{CardKind, Coord, Phase, Responder, SimConfig, Simulation, Stats, Team, UnitId, UnitSpec};

const TICK: f32 = 0.25;
const MAX_TURNS: u32 = 80;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let mut sim = Simulation::new(SimConfig::default().with_seed(seed));

    sim.spawn_unit(UnitSpec::new("T-Rex", Team::Player), Coord::new(2, 1));
    sim.spawn_unit(
        UnitSpec::new("Triceratops", Team::Player).with_stats(Stats::default().with_defense(8).with_move_range(2)),
        Coord::new(5, 1),
    );
    sim.spawn_unit(UnitSpec::new("Raptor", Team::Enemy), Coord::new(3, 10));
    sim.spawn_unit(
        UnitSpec::new("Spinosaurus", Team::Enemy).with_stats(Stats::default().with_attack_power(25)),
        Coord::new(8, 10),
    );

    sim.set_presentation_ready(true);
    sim.request_start();
    tracing::info!(seed, "skirmish started");

    while sim.state().turn_number < MAX_TURNS {
        match sim.phase() {
            Phase::PlayerTurn => play_turn(&mut sim),
            Phase::EnemyTurn => answer_or_wait(&mut sim),
            Phase::Setup => sim.tick(TICK),
            Phase::GameOver => break,
        }
        for event in sim.drain_events() {
            tracing::debug!(?event, "event");
        }
        if Team::ALL.into_iter().any(|team| sim.is_roster_empty(team)) {
            sim.end_game();
        }
    }

    let winner = if sim.is_roster_empty(Team::Enemy) {
        "player"
    } else if sim.is_roster_empty(Team::Player) {
        "enemy"
    } else {
        "nobody"
    };
    let census = sim.card_census();
    tracing::info!(
        winner,
        turns = sim.state().turn_number,
        actions = sim.history().len(),
        reshuffles = sim.state().deck.reshuffle_count(),
        cards = census.total(),
        "skirmish over"
    );
}

/// Every player unit closes in and attacks when it can, then the turn ends.
fn play_turn(sim: &mut Simulation) {
    let roster: Vec<UnitId> = sim.state().battlefield.roster(Team::Player).to_vec();

    for unit in roster {
        if sim.select_unit(unit).is_err() {
            continue;
        }
        if !try_attack(sim, unit) {
            if let Some(tile) = best_step(sim, unit) {
                if sim.on_cell_clicked(tile).is_ok() {
                    settle(sim);
                }
            }
            try_attack(sim, unit);
        }
        if sim.is_roster_empty(Team::Enemy) {
            return;
        }
    }

    if let Err(rejection) = sim.end_player_turn() {
        tracing::warn!(%rejection, "could not end turn");
    }
}

fn try_attack(sim: &mut Simulation, unit: UnitId) -> bool {
    let Some(card) = sim.state().hands[Team::Player].first_of(CardKind::Attack) else {
        return false;
    };
    let Some(target) = sim.state().battlefield.nearest_opponent(unit) else {
        return false;
    };
    let Some(position) = sim.state().battlefield.unit(target).map(|u| u.position()) else {
        return false;
    };

    if sim.select_unit(unit).is_err() || sim.play_card(card).is_err() {
        return false;
    }
    if sim.on_cell_clicked(position).is_err() {
        let _ = sim.cancel_card_mode();
        return false;
    }
    settle(sim);
    true
}

/// Movable tile closest to the nearest enemy.
fn best_step(sim: &Simulation, unit: UnitId) -> Option<Coord> {
    let target = sim.state().battlefield.nearest_opponent(unit)?;
    let goal = sim.state().battlefield.unit(target)?.position();
    sim.movable_tiles()
        .iter()
        .copied()
        .min_by_key(|&c| (c.manhattan(goal), c))
}

/// Tick until no movement or reaction is in flight.
fn settle(sim: &mut Simulation) {
    while sim.is_busy() {
        sim.tick(TICK);
    }
}

/// Block big hits with a Defend card, take small ones.
fn answer_or_wait(sim: &mut Simulation) {
    let Some(pending) = sim.pending_reaction().copied() else {
        sim.tick(TICK);
        return;
    };
    if pending.responder != Responder::Player {
        sim.tick(TICK);
        return;
    }

    let defend = sim.state().hands[Team::Player].first_of(CardKind::Defend);
    let result = match defend {
        Some(card) if pending.pending_damage >= 15 => sim.respond_to_reaction(card),
        _ => sim.decline_reaction(),
    };
    if let Err(rejection) = result {
        tracing::warn!(%rejection, "reaction answer refused");
    }
}
