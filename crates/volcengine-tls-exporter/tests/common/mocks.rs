//! Mock implementations of the producer client for testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use volcengine_tls_exporter::pb::LogGroup;
use volcengine_tls_exporter::producer::{Callback, DeliveryResult, Producer, ProducerError};

/// One recorded `send_logs` invocation.
#[derive(Debug, Clone)]
pub struct SentGroup {
    pub hash_key: Option<String>,
    pub topic_id: String,
    pub source: String,
    pub file_name: String,
    pub group: LogGroup,
}

/// Mock producer that records every send and can be told to fail.
///
/// `fail_from_call` makes `send_logs` return a synchronous error starting at
/// the given zero-based call index; `fail_delivery` drives the callback's
/// failure path on every send, the way the real producer reports a group it
/// gave up on.
#[derive(Default)]
pub struct MockProducer {
    pub sent: Mutex<Vec<SentGroup>>,
    pub send_calls: AtomicUsize,
    pub starts: AtomicUsize,
    pub closes: AtomicUsize,
    pub token_resets: Mutex<Vec<(String, String, String)>>,
    pub fail_from_call: Option<usize>,
    pub fail_delivery: bool,
}

impl MockProducer {
    pub fn recording() -> Arc<Self> {
        Arc::new(MockProducer::default())
    }

    pub fn failing_from_call(index: usize) -> Arc<Self> {
        Arc::new(MockProducer {
            fail_from_call: Some(index),
            ..MockProducer::default()
        })
    }

    pub fn failing_delivery() -> Arc<Self> {
        Arc::new(MockProducer {
            fail_delivery: true,
            ..MockProducer::default()
        })
    }

    pub fn sent(&self) -> Vec<SentGroup> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }
}

#[async_trait]
impl Producer for MockProducer {
    async fn send_logs(
        &self,
        hash_key: Option<&str>,
        topic_id: &str,
        source: &str,
        file_name: &str,
        group: LogGroup,
        callback: Arc<dyn Callback>,
    ) -> Result<(), ProducerError> {
        let call = self.send_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(first_failing) = self.fail_from_call {
            if call >= first_failing {
                return Err(ProducerError::QueueFull);
            }
        }

        self.sent.lock().expect("sent lock poisoned").push(SentGroup {
            hash_key: hash_key.map(str::to_string),
            topic_id: topic_id.to_string(),
            source: source.to_string(),
            file_name: file_name.to_string(),
            group,
        });

        if self.fail_delivery {
            callback.fail(&DeliveryResult {
                successful: false,
                error_code: "InternalServerError".to_string(),
                error_message: "simulated delivery failure".to_string(),
                request_id: "req-123".to_string(),
            });
        } else {
            callback.success(&DeliveryResult {
                successful: true,
                ..DeliveryResult::default()
            });
        }
        Ok(())
    }

    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn reset_access_key_token(&self, access_key_id: &str, access_key_secret: &str, token: &str) {
        self.token_resets
            .lock()
            .expect("token lock poisoned")
            .push((
                access_key_id.to_string(),
                access_key_secret.to_string(),
                token.to_string(),
            ));
    }
}
