use std::time::Duration;

use deckwatch_types::AppConfig;
use tracing::warn;

/// Name the config file is stored under.
pub const APP_NAME: &str = "deckwatch";

pub trait AppConfigExt: Sized {
    /// Load from the platform config directory, falling back to defaults.
    fn load() -> Self;
    fn lookup_timeout(&self) -> Duration;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        confy::load(APP_NAME, None).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_timeout() {
        let config = AppConfig {
            lookup_timeout_ms: 1500,
            ..Default::default()
        };
        assert_eq!(config.lookup_timeout(), Duration::from_millis(1500));
    }
}
