//! Outbound events for the presentation layer.
//!
//! The simulation never renders anything. It appends `SimEvent`s to an
//! outbox and the caller drains them with `Simulation::drain_events` to
//! drive highlights, health bars, the reaction panel and the last-card
//! display.

use serde::{Deserialize, Serialize};

use super::entity::{CardId, UnitId};
use super::team::Team;
use crate::cards::CardKind;
use crate::grid::Coord;
use crate::reaction::ReactionOutcome;
use crate::turn::Phase;

/// Why a set of cells is highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightPurpose {
    Movable,
    Attackable,
    Chargeable,
}

/// Something the presentation layer may want to show.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PhaseChanged {
        phase: Phase,
        turn: u32,
    },
    UnitSelected {
        unit: Option<UnitId>,
    },
    HighlightSet {
        cells: Vec<Coord>,
        purpose: HighlightPurpose,
    },
    HighlightsCleared,
    CardsDrawn {
        team: Team,
        cards: Vec<CardId>,
    },
    DeckReshuffled {
        draw_pile: usize,
    },
    /// A card was played, or an effect that shows as one (an auto-defend).
    CardPlayed {
        card: Option<CardId>,
        kind: CardKind,
        actor: String,
    },
    /// One hop of a movement.
    UnitMoved {
        unit: UnitId,
        from: Coord,
        to: Coord,
    },
    UnitDamaged {
        unit: UnitId,
        amount: i32,
        remaining: i32,
    },
    UnitHealed {
        unit: UnitId,
        amount: i32,
        remaining: i32,
    },
    UnitDied {
        unit: UnitId,
    },
    /// The player may answer an attack before the deadline.
    ReactionOpened {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        deadline_seconds: f32,
        eligible: Vec<CardId>,
    },
    ReactionClosed {
        outcome: ReactionOutcome,
    },
    EquipmentChanged {
        unit: UnitId,
        equipped: Vec<CardId>,
    },
    /// The player's unit is full and must pick a slot to replace.
    EquipmentSlotChoiceRequired {
        unit: UnitId,
        card: CardId,
        slots: usize,
    },
}
