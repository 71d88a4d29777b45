//! Sync layer settings.

use fintra_core::ConfigError;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Upper bound for one page's read batch.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl SyncConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.fetch_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = SyncConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SyncConfig { fetch_timeout_ms: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: SyncConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.fetch_timeout_ms, 15_000);
    }
}
