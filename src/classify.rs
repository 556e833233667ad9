//! Classification of raw CCP records into event kinds.
//!
//! The CCP client does not tag records with a machine-readable kind. The
//! recognizable shapes are leading text markers plus the emitting component:
//!
//! ```text
//! Snapshot:     "GET_AGENT_SNAPSHOT succeeded." with the snapshot in objects[0]
//! API request:  "AWSClient: -->  calling operation 'getAgentSnapshot'"
//! API response: "AWSClient: <--  operation 'getAgentSnapshot' succeeded"
//! RTC report:   component "softphone", text "STATS REPORT ..."
//! ```
//!
//! Anything else is a plain log line.

use crate::event::{EventKind, RawEvent};
use serde_json::Value;

/// Text marker of a successful agent snapshot poll.
const SNAPSHOT_MARKER: &str = "GET_AGENT_SNAPSHOT succeeded";
/// Text prefix of an outgoing API call.
const API_REQUEST_PREFIX: &str = "AWSClient: -->  calling operation '";
/// Text prefix of an API call completion.
const API_RESPONSE_PREFIX: &str = "AWSClient: <--  operation '";
/// Component that emits RTC quality reports.
const SOFTPHONE_COMPONENT: &str = "softphone";
/// Text prefix of an RTC quality report.
const RTC_STATS_PREFIX: &str = "STATS REPORT";

/// Classify a record.
///
/// Never fails: records that match no known shape come back as
/// [`EventKind::Log`].
pub fn classify(event: &RawEvent) -> EventKind {
    let text = event.text.as_deref().unwrap_or("");

    if text.starts_with(SNAPSHOT_MARKER) {
        classify_snapshot(event)
    } else if text.starts_with(API_REQUEST_PREFIX) {
        classify_api_request(event, text).unwrap_or(EventKind::Log)
    } else if text.starts_with(API_RESPONSE_PREFIX) {
        classify_api_response(event, text).unwrap_or(EventKind::Log)
    } else if event.component.as_deref() == Some(SOFTPHONE_COMPONENT)
        && text.starts_with(RTC_STATS_PREFIX)
    {
        EventKind::RtcMetric
    } else {
        EventKind::Log
    }
}

/// Extract the agent state signature from a snapshot record.
fn classify_snapshot(event: &RawEvent) -> EventKind {
    let state = snapshot_field(event, "/snapshot/state/name")
        .and_then(Value::as_str)
        .map(str::to_string);
    let state_started = snapshot_field(event, "/snapshot/state/startTimestamp").map(field_string);
    if state.is_none() {
        log::debug!("snapshot record carries no state payload");
    }
    EventKind::Snapshot {
        state,
        state_started,
    }
}

fn classify_api_request(event: &RawEvent, text: &str) -> Option<EventKind> {
    let rest = text.strip_prefix(API_REQUEST_PREFIX)?;
    let operation = quoted_operation(rest)?;
    Some(EventKind::ApiRequest {
        operation: operation.to_string(),
        request_id: request_id(event),
    })
}

fn classify_api_response(event: &RawEvent, text: &str) -> Option<EventKind> {
    let rest = text.strip_prefix(API_RESPONSE_PREFIX)?;
    let operation = quoted_operation(rest)?;
    let outcome = rest[operation.len() + 1..].trim_start();
    let succeeded = if outcome.starts_with("succeeded") {
        true
    } else if outcome.starts_with("failed") {
        false
    } else {
        return None;
    };
    Some(EventKind::ApiResponse {
        operation: operation.to_string(),
        request_id: request_id(event),
        succeeded,
    })
}

/// Operation name up to the closing quote.
fn quoted_operation(rest: &str) -> Option<&str> {
    let end = rest.find('\'')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// Top-level correlation id, when the client attached one.
fn request_id(event: &RawEvent) -> Option<String> {
    event
        .rest
        .get("requestId")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First payload object field at `pointer`.
fn snapshot_field<'a>(event: &'a RawEvent, pointer: &str) -> Option<&'a Value> {
    event.objects.first().and_then(|object| object.pointer(pointer))
}

/// Render a payload field as a comparable string, whatever its JSON type.
fn field_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
