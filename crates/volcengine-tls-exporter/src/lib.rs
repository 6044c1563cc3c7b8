//! # Volcengine TLS Logs Exporter
//!
//! Exporter plugin that converts an OTLP log-record batch into the TLS
//! (Volcengine log service) wire format and forwards it through a
//! vendor-provided producer client.
//!
//! ## Architecture
//!
//! ```text
//!   Host pipeline (batch of ResourceLogs)
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Pusher     │  (partition by resource/scope)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │  Converter   │  (record -> key/value content pairs)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Producer   │  (vendor SDK: batching, retry, transport)
//!   └──────────────┘
//! ```
//!
//! The producer client owns batching, retries, and transport; this crate is
//! pure field mapping plus a thin push adapter. See [`TlsLogsExporter`] for
//! the host-facing surface and [`producer::Producer`] for the seam a
//! concrete SDK client plugs into.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unreachable_pub)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]

/// Exporter settings and eager validation.
pub mod config;

/// Pure log-record to log-entry conversion.
mod converter;

/// Push adapter implementing the producer's callback contract.
pub mod exporter;

/// Wire types handed to the producer client.
pub mod pb;

/// Contract of the external producer client.
pub mod producer;

pub use config::{Config, ConfigError};
pub use exporter::{ExporterError, TlsLogsExporter};
