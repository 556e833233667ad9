//! Event types shared across the indexing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of a CCP diagnostic log, as read from the dropped file.
///
/// Only the fields the indexer interprets are named. Every other field the
/// client wrote is preserved untouched in `rest` so consumers can render the
/// complete record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Emitting subsystem, e.g. "ccp" or "softphone".
    #[serde(default)]
    pub component: Option<String>,
    /// Client log level ("INFO", "ERROR", ...).
    #[serde(default)]
    pub level: Option<String>,
    /// Log message text. Classification keys on its leading markers.
    #[serde(default)]
    pub text: Option<String>,
    /// Wall-clock time as written by the client, e.g. "2020-03-13T21:34:18.453Z".
    #[serde(default)]
    pub time: Option<String>,
    /// Structured payloads attached to the record (agent snapshots, API results).
    #[serde(default)]
    pub objects: Vec<Value>,
    /// Every field the indexer does not interpret.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Classified kind of a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Result of the periodic GET_AGENT_SNAPSHOT poll.
    Snapshot {
        /// Agent state name at snapshot time ("Available", "AfterCallWork", ...).
        state: Option<String>,
        /// When that state was entered, as written in the snapshot payload.
        state_started: Option<String>,
    },
    /// Outgoing Connect API call.
    ApiRequest {
        operation: String,
        request_id: Option<String>,
    },
    /// Completion of an earlier API call.
    ApiResponse {
        operation: String,
        request_id: Option<String>,
        succeeded: bool,
    },
    /// Softphone RTC quality report.
    RtcMetric,
    /// Any record the classifier does not recognize.
    Log,
}

impl EventKind {
    /// Stable bucket key for the kind-level index.
    pub fn key(&self) -> &'static str {
        match self {
            EventKind::Snapshot { .. } => "snapshot",
            EventKind::ApiRequest { .. } => "api-request",
            EventKind::ApiResponse { .. } => "api-response",
            EventKind::RtcMetric => "rtc-metric",
            EventKind::Log => "log",
        }
    }

    /// Operation name for API traffic, `None` for everything else.
    pub fn operation(&self) -> Option<&str> {
        match self {
            EventKind::ApiRequest { operation, .. } | EventKind::ApiResponse { operation, .. } => {
                Some(operation)
            }
            _ => None,
        }
    }
}

/// A raw record annotated by the indexing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEvent {
    pub raw: RawEvent,
    pub kind: EventKind,
    /// Position in the input array. Stable tie-break key, never reassigned.
    pub original_order: usize,
    /// Derived from `raw.time`; `None` when the field is absent or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Position after time-sorting.
    pub sequence_index: usize,
    /// True for duplicate/supplementary occurrences of a repeatable kind.
    pub is_extra: bool,
}

impl IndexedEvent {
    /// Derived timestamp as epoch milliseconds.
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.timestamp.map(|t| t.timestamp_millis())
    }
}
