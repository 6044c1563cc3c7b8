//! Push adapter between the host pipeline and the producer client.
//!
//! One push partitions the batch into one [`LogGroup`] per resource,
//! converts every record through [`converter`], and hands each group to the
//! producer. The producer owns delivery from there; the exporter only
//! implements the producer's [`Callback`] contract and logs asynchronous
//! failures with full connection context.

use std::sync::Arc;

use opentelemetry_proto::tonic::logs::v1::LogsData;
use thiserror::Error;
use tracing::error;

use crate::config::{Config, ConfigError};
use crate::converter;
use crate::pb::LogGroup;
use crate::producer::{Callback, DeliveryResult, Producer, ProducerError};

/// Error surfaced to the host pipeline.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ExporterError {
    /// Required configuration was missing; the exporter never starts.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    /// The producer rejected a send synchronously; the push aborted.
    #[error("failed to hand log group to producer: {0}")]
    Send(#[from] ProducerError),
}

/// Logs exporter for the TLS log service.
///
/// Holds only immutable state (config and the producer handle), so the host
/// may push independent batches concurrently without extra locking.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone)]
pub struct TlsLogsExporter {
    inner: Arc<Pusher>,
}

struct Pusher {
    config: Config,
    producer: Arc<dyn Producer>,
}

impl std::fmt::Debug for TlsLogsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsLogsExporter")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl TlsLogsExporter {
    /// Validates the configuration and wires the producer.
    ///
    /// When a security token is configured it is applied to the producer
    /// here, before any push.
    pub fn new(config: Config, producer: Arc<dyn Producer>) -> Result<Self, ExporterError> {
        config.validate()?;
        if let Some(token) = &config.security_token {
            producer.reset_access_key_token(&config.access_key_id, &config.access_key_secret, token);
        }
        Ok(TlsLogsExporter {
            inner: Arc::new(Pusher { config, producer }),
        })
    }

    /// Starts the producer's internal delivery loop.
    pub fn start(&self) {
        self.inner.producer.start();
    }

    /// Closes the producer. No other state needs tearing down.
    pub fn shutdown(&self) {
        self.inner.producer.close();
    }

    /// Converts the batch and schedules one send per resource group.
    ///
    /// A synchronous send error aborts the remaining groups and is returned
    /// to the caller; groups already handed off are not rolled back.
    /// Asynchronous delivery failures are reported through the callback and
    /// only logged.
    pub async fn push_logs(&self, logs: LogsData) -> Result<(), ExporterError> {
        let callback: Arc<dyn Callback> = Arc::clone(&self.inner) as Arc<dyn Callback>;

        for group in convert_logs_to_log_groups(&logs) {
            let source = group.source.clone();
            let file_name = group.file_name.clone();
            if let Err(error) = self
                .inner
                .producer
                .send_logs(
                    self.inner.config.hash_key.as_deref(),
                    &self.inner.config.topic_id,
                    &source,
                    &file_name,
                    group,
                    Arc::clone(&callback),
                )
                .await
            {
                error!(%error, topic_id = %self.inner.config.topic_id, "put log group data");
                return Err(error.into());
            }
        }
        Ok(())
    }
}

impl Callback for Pusher {
    fn success(&self, _result: &DeliveryResult) {}

    fn fail(&self, result: &DeliveryResult) {
        error!(
            endpoint = %self.config.endpoint,
            region = %self.config.region,
            topic_id = %self.config.topic_id,
            hash_key = self.config.hash_key.as_deref().unwrap_or(""),
            error_code = %result.error_code,
            error_message = %result.error_message,
            request_id = %result.request_id,
            "send log group to tls failed",
        );
    }
}

/// Builds one log group per resource subtree.
///
/// Resource contents are rendered once per group and scope contents once per
/// scope, then shared across every record beneath them. Records whose body
/// is unset contribute no entry. Groups are emitted even when every record
/// in them was skipped, matching the upstream partitioning.
pub(crate) fn convert_logs_to_log_groups(logs: &LogsData) -> Vec<LogGroup> {
    let mut groups = Vec::with_capacity(logs.resource_logs.len());

    for resource_logs in &logs.resource_logs {
        let mut group = LogGroup {
            logs: Vec::new(),
            source: String::new(),
            file_name: String::new(),
        };
        let resource_contents = converter::resource_to_contents(resource_logs.resource.as_ref());

        for scope_logs in &resource_logs.scope_logs {
            let scope_contents = converter::scope_to_contents(scope_logs.scope.as_ref());
            for record in &scope_logs.log_records {
                if let Some(log) =
                    converter::log_record_to_log(record, &resource_contents, &scope_contents)
                {
                    group.logs.push(log);
                }
            }
        }
        groups.push(group);
    }

    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{any_value, AnyValue};
    use opentelemetry_proto::tonic::logs::v1::{LogRecord, ResourceLogs, ScopeLogs};

    fn record(body: Option<&str>) -> LogRecord {
        LogRecord {
            body: body.map(|text| AnyValue {
                value: Some(any_value::Value::StringValue(text.to_string())),
            }),
            ..LogRecord::default()
        }
    }

    fn batch(records_per_resource: Vec<Vec<LogRecord>>) -> LogsData {
        LogsData {
            resource_logs: records_per_resource
                .into_iter()
                .map(|log_records| ResourceLogs {
                    scope_logs: vec![ScopeLogs {
                        log_records,
                        ..ScopeLogs::default()
                    }],
                    ..ResourceLogs::default()
                })
                .collect(),
        }
    }

    #[test]
    fn one_group_per_resource_with_empty_labels() {
        let groups = convert_logs_to_log_groups(&batch(vec![
            vec![record(Some("a"))],
            vec![record(Some("b"))],
        ]));

        assert_eq!(groups.len(), 2);
        for group in &groups {
            assert_eq!(group.source, "");
            assert_eq!(group.file_name, "");
            assert_eq!(group.logs.len(), 1);
        }
    }

    #[test]
    fn entries_keep_record_order_and_skip_empty_bodies() {
        let groups = convert_logs_to_log_groups(&batch(vec![vec![
            record(Some("first")),
            record(None),
            record(Some("second")),
        ]]));

        assert_eq!(groups.len(), 1);
        let bodies: Vec<&str> = groups[0]
            .logs
            .iter()
            .map(|log| {
                log.contents
                    .iter()
                    .find(|content| content.key == "content")
                    .map(|content| content.value.as_str())
                    .unwrap()
            })
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[test]
    fn group_is_kept_even_when_all_records_are_skipped() {
        let groups = convert_logs_to_log_groups(&batch(vec![vec![record(None)]]));
        assert_eq!(groups.len(), 1);
        assert!(groups[0].logs.is_empty());
    }
}
