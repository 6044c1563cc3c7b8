//! Wire types for the TLS (Volcengine log service) ingestion protocol.
//!
//! These mirror the producer SDK's protobuf schema:
//!
//! ```protobuf
//! message LogContent
//! {
//!     required string Key = 1;
//!     required string Value = 2;
//! }
//!
//! message Log
//! {
//!     required int64 Time = 1; // epoch milliseconds
//!     repeated LogContent Contents = 2;
//! }
//!
//! message LogGroup
//! {
//!     repeated Log Logs = 1;
//!     optional string Source = 2;
//!     optional string FileName = 4;
//! }
//! ```
//!
//! A [`Log`] is the flattened key/value representation of one pipeline log
//! record; a [`LogGroup`] carries every entry derived from one resource
//! subtree. Both are built per push and handed to the producer immediately;
//! nothing here is retained between pushes.

use prost::Message;

/// One key/value string pair inside a log entry.
#[derive(Clone, PartialEq, Message)]
pub struct LogContent {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

impl LogContent {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        LogContent {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One log entry: an ordered list of content pairs plus its timestamp.
#[derive(Clone, PartialEq, Message)]
pub struct Log {
    /// Epoch milliseconds.
    #[prost(int64, tag = "1")]
    pub time: i64,
    #[prost(message, repeated, tag = "2")]
    pub contents: Vec<LogContent>,
}

/// All log entries derived from one resource subtree.
///
/// `source` and `file_name` are routing labels understood by the log
/// service; the exporter leaves both empty.
#[derive(Clone, PartialEq, Message)]
pub struct LogGroup {
    #[prost(message, repeated, tag = "1")]
    pub logs: Vec<Log>,
    #[prost(string, tag = "2")]
    pub source: String,
    #[prost(string, tag = "4")]
    pub file_name: String,
}
