//! Configuration loading: gateway credentials and dispatch settings.
//!
//! Values come from the environment (`SMS_API_URL`, `SMS_API_ID`, `SMS_API_PASSWORD`,
//! `HTTP_TIMEOUT`, `SMS_USE_REPORT`, `SMS_COOLDOWN_SECS`) or, for credentials, from a JSON
//! document with `api_url`, `api_id` and `api_password` keys.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::client::{Credentials, DEFAULT_API_URL, DEFAULT_TIMEOUT, GatewayClient, GatewayError};
use crate::dispatch::{DEFAULT_COOLDOWN, DispatchCoordinator, SendDedupCache};
use crate::domain::ValidationError;

pub const ENV_API_URL: &str = "SMS_API_URL";
pub const ENV_API_ID: &str = "SMS_API_ID";
pub const ENV_API_PASSWORD: &str = "SMS_API_PASSWORD";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";
pub const ENV_USE_REPORT: &str = "SMS_USE_REPORT";
pub const ENV_COOLDOWN_SECS: &str = "SMS_COOLDOWN_SECS";

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid configuration value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid credentials: {0}")]
    Credentials(#[from] ValidationError),
}

#[derive(Debug, Deserialize)]
struct CredentialsDocument {
    #[serde(alias = "apiUrl")]
    api_url: String,
    #[serde(alias = "apiId")]
    api_id: String,
    #[serde(alias = "apiPassword")]
    api_password: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// `SMS_API_URL` falls back to [`DEFAULT_API_URL`]; the id and password are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_id = lookup(ENV_API_ID).ok_or(ConfigError::MissingEnvVar(ENV_API_ID))?;
        let api_password =
            lookup(ENV_API_PASSWORD).ok_or(ConfigError::MissingEnvVar(ENV_API_PASSWORD))?;
        Ok(Self::new(api_url, api_id, api_password)?)
    }

    /// Parse a JSON credentials document; every key is required.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: CredentialsDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.api_url, doc.api_id, doc.api_password)?)
    }
}

/// Tunables for a dispatch process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Per-call HTTP timeout.
    pub timeout: Duration,
    /// Request delivery reports (`status=1` + `smsid`).
    pub use_delivery_report: bool,
    /// Window for variant alternation on repeat sends.
    pub cooldown: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            use_delivery_report: false,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl DispatchSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables keep their defaults; set ones must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout = match lookup(ENV_HTTP_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_secs(ENV_HTTP_TIMEOUT, &raw)?),
            None => defaults.timeout,
        };
        let cooldown = match lookup(ENV_COOLDOWN_SECS) {
            Some(raw) => Duration::from_secs(parse_secs(ENV_COOLDOWN_SECS, &raw)?),
            None => defaults.cooldown,
        };
        let use_delivery_report = lookup(ENV_USE_REPORT).is_some_and(|raw| raw.trim() == "1");

        Ok(Self {
            timeout,
            use_delivery_report,
            cooldown,
        })
    }

    /// Wire a coordinator with a fresh cache from these settings.
    pub fn coordinator(&self, credentials: Credentials) -> Result<DispatchCoordinator, GatewayError> {
        let client = GatewayClient::builder(credentials)
            .timeout(self.timeout)
            .build()?;
        let cache = Arc::new(SendDedupCache::new(self.cooldown));
        Ok(DispatchCoordinator::new(client, cache))
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            message: format!("{raw:?}: {err}"),
        })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            message: "must be greater than zero".to_owned(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key: &str| map.get(key).map(|value| (*value).to_owned())
    }

    #[test]
    fn credentials_from_lookup_uses_default_url() {
        let credentials =
            Credentials::from_lookup(lookup_from(&[("SMS_API_ID", "user"), ("SMS_API_PASSWORD", "pw")]))
                .unwrap();
        assert_eq!(credentials.api_url().as_str(), DEFAULT_API_URL);
        assert_eq!(credentials.api_id().as_str(), "user");
    }

    #[test]
    fn credentials_from_lookup_requires_id_and_password() {
        let err = Credentials::from_lookup(lookup_from(&[("SMS_API_PASSWORD", "pw")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("SMS_API_ID")));

        let err = Credentials::from_lookup(lookup_from(&[("SMS_API_ID", "user")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("SMS_API_PASSWORD")));

        let err = Credentials::from_lookup(lookup_from(&[
            ("SMS_API_ID", "  "),
            ("SMS_API_PASSWORD", "pw"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Credentials(ValidationError::Empty { field: "api_id" })
        ));
    }

    #[test]
    fn credentials_from_json_accepts_snake_and_camel_case() {
        let credentials = Credentials::from_json(
            r#"{"api_url": "https://gw.example.invalid/api/", "api_id": "u", "api_password": "p"}"#,
        )
        .unwrap();
        assert_eq!(credentials.api_url().as_str(), "https://gw.example.invalid/api/");

        let credentials = Credentials::from_json(
            r#"{"apiUrl": "https://gw.example.invalid/api/", "apiId": "u", "apiPassword": "p"}"#,
        )
        .unwrap();
        assert_eq!(credentials.api_id().as_str(), "u");
    }

    #[test]
    fn credentials_from_json_rejects_missing_or_bad_fields() {
        let err = Credentials::from_json(r#"{"api_id": "u", "api_password": "p"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Credentials::from_json(r#"{"api_url": "nope", "api_id": "u", "api_password": "p"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Credentials(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn settings_defaults_and_overrides() {
        let settings = DispatchSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, DispatchSettings::default());
        assert_eq!(settings.timeout, Duration::from_secs(15));
        assert_eq!(settings.cooldown, Duration::from_secs(60));
        assert!(!settings.use_delivery_report);

        let settings = DispatchSettings::from_lookup(lookup_from(&[
            ("HTTP_TIMEOUT", "30"),
            ("SMS_USE_REPORT", "1"),
            ("SMS_COOLDOWN_SECS", "120"),
        ]))
        .unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.use_delivery_report);
        assert_eq!(settings.cooldown, Duration::from_secs(120));

        let settings =
            DispatchSettings::from_lookup(lookup_from(&[("SMS_USE_REPORT", "yes")])).unwrap();
        assert!(!settings.use_delivery_report);
    }

    #[test]
    fn settings_reject_unparseable_numbers() {
        let err = DispatchSettings::from_lookup(lookup_from(&[("HTTP_TIMEOUT", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT",
                ..
            }
        ));

        let err =
            DispatchSettings::from_lookup(lookup_from(&[("SMS_COOLDOWN_SECS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SMS_COOLDOWN_SECS",
                ..
            }
        ));
    }

    #[test]
    fn settings_build_a_coordinator_with_configured_cooldown() {
        let settings = DispatchSettings {
            cooldown: Duration::from_secs(5),
            ..DispatchSettings::default()
        };
        let credentials =
            Credentials::new("https://gw.example.invalid/api/", "user", "pw").unwrap();
        let coordinator = settings.coordinator(credentials).unwrap();
        assert_eq!(coordinator.cache().cooldown(), Duration::from_secs(5));
        assert!(coordinator.cache().is_empty());
    }
}
