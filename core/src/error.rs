//! Engine error taxonomy.
//!
//! None of these are fatal. The session loop logs them, echoes the
//! user-facing ones to the console, and keeps running.

use thiserror::Error;

use crate::catalog::LookupError;
use crate::command::CommandError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Telemetry with missing or unexpected fields. The update is skipped.
    #[error("malformed telemetry: {0}")]
    MalformedTelemetry(String),

    /// One card could not be resolved. It is left out of the deck.
    #[error("lookup failed for card {card_id}: {source}")]
    LookupFailure {
        card_id: String,
        #[source]
        source: LookupError,
    },

    #[error(transparent)]
    InvalidCommand(#[from] CommandError),

    /// A completion from a rebuild that has since been superseded.
    #[error("stale resolution for card {card_id} (generation {generation}, current {current})")]
    StaleResolution {
        card_id: String,
        generation: u64,
        current: u64,
    },
}

impl EngineError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedTelemetry(detail.into())
    }
}
