use serde::{Deserialize, Serialize};

/// Persisted application settings.
///
/// Missing keys fall back to their defaults so older config files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON card table used to resolve roster card ids.
    pub catalog_path: String,
    /// Newline-delimited JSON telemetry capture to follow.
    pub telemetry_path: String,
    /// Upper bound for a single card lookup.
    pub lookup_timeout_ms: u64,
    /// Echo raw info updates and event batches into the log view.
    pub mirror_telemetry: bool,
    /// Event names that highlight a mirrored event batch.
    pub highlight_events: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: "cards.json".to_string(),
            telemetry_path: "telemetry.ndjson".to_string(),
            lookup_timeout_ms: 5000,
            mirror_telemetry: true,
            highlight_events: vec!["match".to_string()],
        }
    }
}
