//! Connection settings for the managed backend.
//!
//! All fields are required unless explicitly marked optional.

use fintra_core::{ConfigError, UserId};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub api_base_url: String,
    pub auth: AuthConfig,
    /// Signed-in user; passed to RPCs that record who made a change.
    pub user_id: UserId,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Public project key sent as `apikey`.
    pub anon_key: String,
    /// User session token. Falls back to the anon key when absent.
    pub access_token: Option<String>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "client.api_base_url".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "client.api_base_url".to_string(),
                value: base.to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.auth.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "client.auth.anon_key".to_string(),
            });
        }
        if self
            .auth
            .access_token
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "client.auth.access_token".to_string(),
                value: String::new(),
                reason: "must not be empty when provided".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.request_timeout_ms".to_string(),
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
    use uuid::Uuid;

    fn base_config() -> ClientConfig {
        ClientConfig {
            api_base_url: "https://project.supabase.co".to_string(),
            auth: AuthConfig {
                anon_key: "anon".to_string(),
                access_token: Some("jwt".to_string()),
            },
            user_id: Uuid::nil(),
            request_timeout_ms: 10_000,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_requires_scheme() {
        let mut config = base_config();
        config.api_base_url = "project.supabase.co".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_requires_anon_key() {
        let mut config = base_config();
        config.auth.anon_key = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = base_config();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let toml_like = serde_json::json!({
            "api_base_url": "https://x.supabase.co",
            "auth": { "anon_key": "k", "access_token": null },
            "user_id": "00000000-0000-0000-0000-000000000000",
            "request_timeout_ms": 1000,
            "grpc_endpoint": "nope"
        });
        assert!(serde_json::from_value::<ClientConfig>(toml_like).is_err());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: a base URL validates exactly when it carries an http(s) scheme.
        #[test]
        fn prop_base_url_scheme(scheme in "(https?|ftp|ws)://", host in "[a-z]{1,12}\\.example\\.com") {
            let config = ClientConfig {
                api_base_url: format!("{scheme}{host}"),
                auth: AuthConfig {
                    anon_key: "anon".to_string(),
                    access_token: None,
                },
                user_id: Uuid::nil(),
                request_timeout_ms: 1_000,
            };
            let expected = scheme.starts_with("http");
            prop_assert_eq!(config.validate().is_ok(), expected);
        }
    }
}
