//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::connection::DEFAULT_PROBE_INTERVAL;

/// Default per-request timeout applied by the HTTP transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Game type sent when creating a match.
pub const DEFAULT_GAME_TYPE: &str = "501";

pub const ENV_SERVER_URL: &str = "DARTS_SERVER_URL";
pub const ENV_PROBE_INTERVAL_MS: &str = "DARTS_PROBE_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "DARTS_REQUEST_TIMEOUT_MS";
pub const ENV_GAME_TYPE: &str = "DARTS_GAME_TYPE";

/// Configuration for a [`MatchSession`](crate::session::MatchSession).
///
/// Only `base_url` is required. Durations are (de)serialized as integer
/// milliseconds.
///
/// ```
/// use darts_state::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("http://localhost:5000")
///     .with_probe_interval(Duration::from_secs(2));
/// assert_eq!(config.game_type, "501");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Interval between connectivity probes.
    #[serde(with = "duration_ms", rename = "probe_interval_ms")]
    pub probe_interval: Duration,

    /// Timeout for each request. Zero durations are ignored by the builder.
    #[serde(with = "duration_ms", rename = "request_timeout_ms")]
    pub request_timeout: Duration,

    /// Game type for new matches.
    pub game_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            probe_interval: DEFAULT_PROBE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            game_type: DEFAULT_GAME_TYPE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `DARTS_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse a JSON document; missing fields keep their defaults and zero
    /// durations fall back to them.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    #[must_use]
    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.probe_interval = interval;
        }
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = timeout;
        }
        self
    }

    #[must_use]
    pub fn with_game_type(mut self, game_type: impl Into<String>) -> Self {
        self.game_type = game_type.into();
        self
    }

    fn normalized(mut self) -> Self {
        if self.probe_interval.is_zero() {
            tracing::warn!("zero probe interval, using default");
            self.probe_interval = DEFAULT_PROBE_INTERVAL;
        }
        if self.request_timeout.is_zero() {
            tracing::warn!("zero request timeout, using default");
            self.request_timeout = DEFAULT_REQUEST_TIMEOUT;
        }
        self
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.base_url = url;
        }
        if let Some(ms) = parse_ms(ENV_PROBE_INTERVAL_MS, lookup(ENV_PROBE_INTERVAL_MS)) {
            self.probe_interval = ms;
        }
        if let Some(ms) = parse_ms(ENV_REQUEST_TIMEOUT_MS, lookup(ENV_REQUEST_TIMEOUT_MS)) {
            self.request_timeout = ms;
        }
        if let Some(game_type) = lookup(ENV_GAME_TYPE) {
            self.game_type = game_type;
        }
    }
}

fn parse_ms(key: &str, value: Option<String>) -> Option<Duration> {
    let raw = value?;
    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(key, value = %raw, "ignoring invalid duration: {e}");
            None
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://darts.local");
        assert_eq!(config.base_url, "http://darts.local");
        assert_eq!(config.probe_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.game_type, "501");
    }

    #[test]
    fn test_builder_ignores_zero() {
        let config = ClientConfig::new("x")
            .with_probe_interval(Duration::ZERO)
            .with_request_timeout(Duration::from_secs(3));
        assert_eq!(config.probe_interval, DEFAULT_PROBE_INTERVAL);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_SERVER_URL, "http://10.0.0.2:5000"),
            (ENV_PROBE_INTERVAL_MS, "2500"),
            (ENV_REQUEST_TIMEOUT_MS, "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.probe_interval, Duration::from_millis(2500));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.game_type, "501");
    }

    #[test]
    fn test_json() {
        let config =
            ClientConfig::from_json(r#"{"base_url": "http://x", "probe_interval_ms": 1000}"#)
                .unwrap();
        assert_eq!(config.probe_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["request_timeout_ms"], 10_000);
    }

    #[test]
    fn test_json_zero_durations_use_defaults() {
        let config = ClientConfig::from_json(
            r#"{"base_url": "http://t", "probe_interval_ms": 0, "request_timeout_ms": 0}"#,
        )
        .unwrap();
        assert_eq!(config.probe_interval, DEFAULT_PROBE_INTERVAL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
