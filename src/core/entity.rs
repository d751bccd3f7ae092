//! Identifiers for simulation objects.
//!
//! Units and card instances each get an opaque, copyable id. Ids are
//! allocated monotonically by their owners (`Battlefield` for units,
//! `Deck` for cards) and never reused within a simulation.
//!
//! ```
//! use dino_tactics::core::{CardId, UnitId};
//!
//! let rex = UnitId::new(0);
//! let card = CardId::new(12);
//!
//! assert_eq!(rex.raw(), 0);
//! assert_eq!(card.to_string(), "Card(12)");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! sim_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

sim_id!(
    /// A unit on the battlefield. Stays valid after death, but lookups
    /// return `None` once the unit is removed.
    UnitId,
    "Unit"
);

sim_id!(
    /// One physical card instance.
    ///
    /// Two Attack cards are different instances with different ids; the id
    /// follows the card through draw pile, hand, discard pile and equipment.
    CardId,
    "Card"
);
