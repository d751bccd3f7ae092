//! Reaction protocol: suspended attacks and the defender's response window.

mod protocol;

pub use protocol::{BlockSource, ReactionContext, ReactionOutcome, ReactionProtocol, ReactionStatus, Responder};
