//! Cards and the deck/hand economy.
//!
//! - `Card` / `CardKind` / `EquipmentKind`: what a card is and does
//! - `Deck`: draw pile, discard pile, reshuffle-on-empty
//! - `Hand`: per-actor bounded hand

pub mod card;
pub mod deck;
pub mod hand;

pub use card::{Card, CardKind, EquipmentKind};
pub use deck::Deck;
pub use hand::Hand;
