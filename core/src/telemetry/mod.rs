//! Live game telemetry
//!
//! The host delivers two callback shapes: info updates (arbitrary objects,
//! keyed by feature) and event batches (`{ "events": [{ "name", "data" }] }`).
//! [`parse_update`] classifies one JSON line into either; [`TelemetryReactor`]
//! turns them into deck rebuilds and match lifecycle transitions.

pub mod feed;
mod reactor;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineError;

pub use feed::tail_telemetry;
pub use reactor::{MatchLifecycle, TelemetryReactor};

/// Event name that moves the lifecycle into a match.
pub const MATCH_START: &str = "match_start";

/// Features registered with the host at startup. `decks` carries the roster.
pub const INTERESTING_FEATURES: &[&str] = &[
    "counters",
    "death",
    "decks",
    "items",
    "kill",
    "killed",
    "killer",
    "location",
    "match_info",
    "match",
    "me",
    "phase",
    "rank",
    "revived",
    "roster",
    "team",
];

/// The closed set of features this engine listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    features: Vec<String>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new(INTERESTING_FEATURES.iter().copied())
    }
}

impl Subscription {
    pub fn new<'a>(features: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            features: features.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Updates that do not name a feature are always accepted.
    pub fn accepts(&self, feature: Option<&str>) -> bool {
        feature.is_none_or(|f| self.features.iter().any(|s| s == f))
    }
}

/// One info update payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoUpdate {
    pub payload: Map<String, Value>,
}

impl InfoUpdate {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        match value {
            Value::Object(payload) => Ok(Self { payload }),
            other => Err(EngineError::malformed(format!(
                "info update is not an object: {other}"
            ))),
        }
    }

    pub fn feature(&self) -> Option<&str> {
        self.payload.get("feature").and_then(Value::as_str)
    }

    /// The roster, at the top level or nested under `info`.
    pub fn decks(&self) -> Option<&Value> {
        self.payload.get("decks").or_else(|| {
            self.payload
                .get("info")
                .and_then(Value::as_object)
                .and_then(|info| info.get("decks"))
        })
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.payload.clone()).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl GameEvent {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventBatch {
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

impl EventBatch {
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self { events }
    }

    /// Name of the first event; the batch is classified by it alone.
    pub fn first_name(&self) -> Option<&str> {
        self.events.first().map(|e| e.name.as_str())
    }

    pub fn contains_any(&self, names: &[String]) -> bool {
        self.events.iter().any(|e| names.contains(&e.name))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryUpdate {
    Info(InfoUpdate),
    Events(EventBatch),
}

/// Classify one line of telemetry JSON.
///
/// An object with an `events` key is an event batch; any other object is an
/// info update.
pub fn parse_update(line: &str) -> Result<TelemetryUpdate, EngineError> {
    let value: Value = serde_json::from_str(line.trim())
        .map_err(|e| EngineError::malformed(format!("invalid JSON: {e}")))?;

    let is_batch = value.as_object().is_some_and(|o| o.contains_key("events"));
    if is_batch {
        let batch: EventBatch = serde_json::from_value(value)
            .map_err(|e| EngineError::malformed(format!("invalid event batch: {e}")))?;
        return Ok(TelemetryUpdate::Events(batch));
    }

    InfoUpdate::from_value(value).map(TelemetryUpdate::Info)
}
