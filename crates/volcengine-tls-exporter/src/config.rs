//! Exporter configuration.
//!
//! Settings are declarative and validated eagerly: [`Config::validate`] runs
//! once before the exporter starts and never re-runs per batch. All fields
//! map one-to-one onto keys the host collector recognizes for this exporter
//! (`endpoint`, `region`, `access_key_id`, `access_key_secret`,
//! `security_token`, `topic_id`, `hash_key`).

use serde::Deserialize;
use thiserror::Error;

/// Configuration for the TLS logs exporter.
///
/// `access_key_secret` and `security_token` are credentials; avoid logging
/// them. Everything except `security_token` and `hash_key` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TLS ingestion endpoint, e.g. "https://tls-cn-beijing.volces.com".
    pub endpoint: String,
    /// TLS region; must match the endpoint.
    pub region: String,
    /// Access key id used by the producer client.
    pub access_key_id: String,
    /// Access key secret used by the producer client.
    pub access_key_secret: String,
    /// Optional STS security token for temporary credentials.
    pub security_token: Option<String>,
    /// Topic the log groups are written to.
    pub topic_id: String,
    /// Optional routing key used by the service to pick a shard.
    pub hash_key: Option<String>,
}

/// Error returned when required configuration is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ConfigError {
    /// One or more required fields were empty.
    #[error("invalid configuration: missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl Config {
    /// Checks that every required field is non-empty.
    ///
    /// Pure precondition check with no side effects. The returned error
    /// names every missing field so the host can report them all at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.endpoint.is_empty() {
            missing.push("endpoint");
        }
        if self.region.is_empty() {
            missing.push("region");
        }
        if self.access_key_id.is_empty() {
            missing.push("access_key_id");
        }
        if self.access_key_secret.is_empty() {
            missing.push("access_key_secret");
        }
        if self.topic_id.is_empty() {
            missing.push("topic_id");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields(missing))
        }
    }
}
