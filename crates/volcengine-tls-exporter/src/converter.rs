//! Pure conversion from pipeline log records to TLS log entries.
//!
//! Everything in this module is stateless and does no I/O. Resource and
//! scope metadata are rendered once per group and shared by reference across
//! every record in that group, so all entries under one resource+scope carry
//! byte-identical metadata pairs.
//!
//! Content key layout per entry, in order:
//!
//! | key               | value                                        |
//! |-------------------|----------------------------------------------|
//! | `resource`        | JSON object of resource attributes           |
//! | `instrumentation` | JSON object `{attributes, name, version}`    |
//! | `severity_number` | decimal string                               |
//! | `severity_text`   | as-is                                        |
//! | `attribute`       | JSON object of record attributes             |
//! | `content`         | record body, stringified                     |
//! | `flags`           | lowercase hex                                |
//! | `trace_id`        | lowercase hex                                |
//! | `span_id`         | lowercase hex                                |

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use opentelemetry_proto::tonic::common::v1::{any_value, AnyValue, InstrumentationScope, KeyValue};
use opentelemetry_proto::tonic::logs::v1::LogRecord;
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::pb::{Log, LogContent};

const RESOURCE_KEY: &str = "resource";
const INSTRUMENTATION_KEY: &str = "instrumentation";
const SEVERITY_NUMBER_KEY: &str = "severity_number";
const SEVERITY_TEXT_KEY: &str = "severity_text";
const ATTRIBUTE_KEY: &str = "attribute";
const BODY_KEY: &str = "content";
const FLAGS_KEY: &str = "flags";
const TRACE_ID_KEY: &str = "trace_id";
const SPAN_ID_KEY: &str = "span_id";

/// Fixed pairs appended per record on top of the shared metadata pairs.
const RECORD_PAIR_COUNT: usize = 7;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Renders all resource attributes into the single `resource` content pair.
pub(crate) fn resource_to_contents(resource: Option<&Resource>) -> Vec<LogContent> {
    let mut fields = BTreeMap::new();
    if let Some(resource) = resource {
        for attribute in &resource.attributes {
            fields.insert(attribute.key.clone(), attribute_string(attribute));
        }
    }
    let payload = serde_json::to_string(&fields).unwrap_or_else(|_| "{}".to_string());
    vec![LogContent::new(RESOURCE_KEY, payload)]
}

/// Renders scope name, version, and attributes into the single
/// `instrumentation` content pair.
pub(crate) fn scope_to_contents(scope: Option<&InstrumentationScope>) -> Vec<LogContent> {
    let mut attributes = BTreeMap::new();
    let (name, version) = match scope {
        Some(scope) => {
            for attribute in &scope.attributes {
                attributes.insert(attribute.key.clone(), attribute_string(attribute));
            }
            (scope.name.as_str(), scope.version.as_str())
        }
        None => ("", ""),
    };
    let fields = serde_json::json!({
        "attributes": attributes,
        "name": name,
        "version": version,
    });
    let payload = serde_json::to_string(&fields).unwrap_or_else(|_| "{}".to_string());
    vec![LogContent::new(INSTRUMENTATION_KEY, payload)]
}

/// Maps one log record to a TLS log entry.
///
/// Returns `None` when the record body is unset: such records are dropped
/// entirely and do not count as errors. The shared `resource_contents` and
/// `scope_contents` pairs are cloned into the entry, never recomputed.
pub(crate) fn log_record_to_log(
    record: &LogRecord,
    resource_contents: &[LogContent],
    scope_contents: &[LogContent],
) -> Option<Log> {
    let body = record.body.as_ref().and_then(|body| body.value.as_ref())?;

    let mut contents =
        Vec::with_capacity(RECORD_PAIR_COUNT + resource_contents.len() + scope_contents.len());
    contents.extend_from_slice(resource_contents);
    contents.extend_from_slice(scope_contents);

    contents.push(LogContent::new(
        SEVERITY_NUMBER_KEY,
        record.severity_number.to_string(),
    ));
    contents.push(LogContent::new(
        SEVERITY_TEXT_KEY,
        record.severity_text.clone(),
    ));

    let mut attributes = BTreeMap::new();
    for attribute in &record.attributes {
        attributes.insert(attribute.key.clone(), attribute_string(attribute));
    }
    let attribute_payload =
        serde_json::to_string(&attributes).unwrap_or_else(|_| "{}".to_string());
    contents.push(LogContent::new(ATTRIBUTE_KEY, attribute_payload));

    contents.push(LogContent::new(BODY_KEY, value_string(body)));
    contents.push(LogContent::new(FLAGS_KEY, format!("{:x}", record.flags)));
    contents.push(LogContent::new(TRACE_ID_KEY, hex::encode(&record.trace_id)));
    contents.push(LogContent::new(SPAN_ID_KEY, hex::encode(&record.span_id)));

    Some(Log {
        time: entry_time_millis(record),
        contents,
    })
}

/// Timestamp selection: explicit timestamp, then observed timestamp, then
/// wall clock at conversion. Normalized to epoch milliseconds.
fn entry_time_millis(record: &LogRecord) -> i64 {
    if record.time_unix_nano > 0 {
        (record.time_unix_nano / NANOS_PER_MILLI) as i64
    } else if record.observed_time_unix_nano > 0 {
        (record.observed_time_unix_nano / NANOS_PER_MILLI) as i64
    } else {
        now_millis()
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

fn attribute_string(attribute: &KeyValue) -> String {
    attribute
        .value
        .as_ref()
        .and_then(|value| value.value.as_ref())
        .map(value_string)
        .unwrap_or_default()
}

/// Canonical string form of an attribute or body value, regardless of its
/// original type. Scalars use their display form, binary data is
/// hex-encoded, and composite values become JSON documents.
fn value_string(value: &any_value::Value) -> String {
    match value {
        any_value::Value::StringValue(text) => text.clone(),
        any_value::Value::BoolValue(flag) => flag.to_string(),
        any_value::Value::IntValue(number) => number.to_string(),
        any_value::Value::DoubleValue(number) => number.to_string(),
        any_value::Value::BytesValue(bytes) => hex::encode(bytes),
        composite => serde_json::to_string(&value_json(composite))
            .unwrap_or_else(|_| "{}".to_string()),
    }
}

fn value_json(value: &any_value::Value) -> serde_json::Value {
    match value {
        any_value::Value::StringValue(text) => serde_json::Value::from(text.clone()),
        any_value::Value::BoolValue(flag) => serde_json::Value::from(*flag),
        any_value::Value::IntValue(number) => serde_json::Value::from(*number),
        any_value::Value::DoubleValue(number) => serde_json::Number::from_f64(*number)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        any_value::Value::BytesValue(bytes) => serde_json::Value::from(hex::encode(bytes)),
        any_value::Value::ArrayValue(array) => serde_json::Value::Array(
            array.values.iter().map(any_value_json).collect(),
        ),
        any_value::Value::KvlistValue(entries) => {
            let mut fields = serde_json::Map::new();
            for entry in &entries.values {
                fields.insert(
                    entry.key.clone(),
                    entry.value.as_ref().map_or(serde_json::Value::Null, any_value_json),
                );
            }
            serde_json::Value::Object(fields)
        }
    }
}

fn any_value_json(value: &AnyValue) -> serde_json::Value {
    value
        .value
        .as_ref()
        .map_or(serde_json::Value::Null, value_json)
}
