//! Team identification and per-team data storage.
//!
//! ## Team
//!
//! The two sides of a skirmish. The player side is driven by external
//! input; the enemy side is driven by the built-in AI policy.
//!
//! ## TeamMap
//!
//! Fixed two-slot storage indexed by `Team`, used for rosters and hands.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One side of the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Controlled through input events.
    Player,
    /// Controlled by the AI policy.
    Enemy,
}

impl Team {
    /// Both teams, in turn order.
    pub const ALL: [Team; 2] = [Team::Player, Team::Enemy];

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }

    /// Whether units of this team answer attacks through the interactive
    /// reaction window and choose equipment slots themselves.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Team::Player)
    }

    /// Storage index for `TeamMap`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::Player => 0,
            Team::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Player => write!(f, "Player"),
            Team::Enemy => write!(f, "Enemy"),
        }
    }
}

/// One `T` per side, indexed by `Team`.
///
/// ## Example
///
/// ```
/// use dino_tactics::core::{Team, TeamMap};
///
/// let mut kills: TeamMap<u32> = TeamMap::default();
/// kills[Team::Enemy] += 3;
///
/// assert_eq!(kills[Team::Player], 0);
/// assert_eq!(kills[Team::Enemy], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; 2],
}

impl<T> TeamMap<T> {
    /// Build each side's entry from `factory`.
    pub fn new(factory: impl Fn(Team) -> T) -> Self {
        Self {
            data: [factory(Team::Player), factory(Team::Enemy)],
        }
    }

    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Entries in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: Default> Default for TeamMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Team> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<Team> for TeamMap<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        &mut self.data[team.index()]
    }
}
