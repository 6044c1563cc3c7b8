//! Seam to the vendor-provided producer client.
//!
//! The producer owns everything downstream of this exporter: batching,
//! signing, transport, and retry. The exporter only needs the narrow
//! contract modeled here — enqueue a [`LogGroup`](crate::pb::LogGroup) for
//! delivery, bracket pushes with `start`/`close`, and receive asynchronous
//! delivery notifications through a [`Callback`] handle.
//!
//! Delivery callbacks fire on the producer's own worker threads, concurrently
//! with each other and with ongoing pushes, so implementations must be
//! `Send + Sync` and must not assume any ordering relative to the
//! `send_logs` call that scheduled them.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::pb::LogGroup;

/// Outcome of one delivery attempt, reported through [`Callback`].
#[derive(Debug, Clone, Default)]
pub struct DeliveryResult {
    /// Whether the group was accepted by the log service.
    pub successful: bool,
    /// Service error code, empty on success.
    pub error_code: String,
    /// Human-readable failure detail, empty on success.
    pub error_message: String,
    /// Request id assigned by the service, when one was issued.
    pub request_id: String,
}

/// Delivery notification handle passed to [`Producer::send_logs`].
///
/// Invoked by the producer outside the call stack that issued the send.
pub trait Callback: Send + Sync {
    /// The group was delivered. Called once per accepted group.
    fn success(&self, result: &DeliveryResult);
    /// The producer gave up on the group after exhausting its own retries.
    fn fail(&self, result: &DeliveryResult);
}

/// Error returned synchronously when a send cannot be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ProducerError {
    /// The producer was closed before or during the send.
    #[error("producer is closed")]
    Closed,
    /// The producer's internal buffer is full and not draining.
    #[error("producer queue is full")]
    QueueFull,
    /// The group exceeds the service's single-request size limit.
    #[error("log group exceeds maximum payload size")]
    PayloadTooLarge,
    /// The send parameters were rejected, e.g. an unknown topic.
    #[error("invalid send argument: {0}")]
    InvalidArgument(String),
}

/// Vendor producer client contract.
///
/// Mirrors the SDK producer the exporter hands groups to: `send_logs` is an
/// enqueue that may await internal buffer capacity and returns immediately
/// once the group is scheduled; actual delivery is reported later through
/// the callback.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Schedules one log group for delivery.
    ///
    /// `hash_key` is an optional shard-routing hint; `source` and
    /// `file_name` are the group's routing labels. A returned error means
    /// the group was never scheduled.
    async fn send_logs(
        &self,
        hash_key: Option<&str>,
        topic_id: &str,
        source: &str,
        file_name: &str,
        group: LogGroup,
        callback: Arc<dyn Callback>,
    ) -> Result<(), ProducerError>;

    /// Starts the producer's internal delivery loop.
    fn start(&self);

    /// Stops the delivery loop. Groups already scheduled may still complete.
    fn close(&self);

    /// Swaps the producer's credentials for an STS token set.
    fn reset_access_key_token(&self, access_key_id: &str, access_key_secret: &str, token: &str);
}

/// Connection settings a concrete producer client is constructed from.
///
/// The exporter never opens a connection itself; it derives these from its
/// own [`Config`] and hands them to whatever SDK producer the host wires in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct ProducerSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl ProducerSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        ProducerSettings {
            endpoint: config.endpoint.clone(),
            region: config.region.clone(),
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
        }
    }
}
