//! Active deck model
//!
//! - **Roster**: raw deck-slot payloads reported by telemetry
//! - **Model**: the cost-ordered, name-deduplicated card list built from them
//!
//! ```text
//!   info update { decks: { slot -> "[{cardId, count}, ...]" } }
//!                     │
//!          parse_roster (one RosterEntry per slot)
//!                     │
//!          DeckModel::rebuild_from ──► one lookup task per card
//!                     │                         │
//!                     │           Resolution { generation, .. }
//!                     ▼                         │
//!          DeckModel::complete  ◄───────────────┘
//!          (stale generations dropped, failures omitted)
//! ```

mod model;
mod roster;

#[cfg(test)]
mod model_tests;

pub use model::{CardResolver, DeckModel, Resolution};
pub use roster::{RosterCard, RosterEntry, parse_roster};
