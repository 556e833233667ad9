//! Kind- and operation-keyed indices over the annotated sequence, and the
//! [`LoadedLog`] artifact a successful load publishes.

use crate::event::IndexedEvent;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Lookup maps over the sorted sequence.
///
/// Positions refer to sequence order, so bucket contents are time-ordered.
/// Every event lands in exactly one `by_kind` bucket; API traffic is
/// additionally bucketed per operation name. Rebuilt wholesale on each load,
/// never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogIndex {
    by_kind: HashMap<&'static str, Vec<usize>>,
    by_api: HashMap<String, Vec<usize>>,
}

impl LogIndex {
    /// Build both maps in one pass over the annotated sequence.
    pub fn build(events: &[IndexedEvent]) -> Self {
        let mut index = LogIndex::default();
        for event in events {
            index
                .by_kind
                .entry(event.kind.key())
                .or_default()
                .push(event.sequence_index);
            if let Some(operation) = event.kind.operation() {
                index
                    .by_api
                    .entry(operation.to_string())
                    .or_default()
                    .push(event.sequence_index);
            }
        }
        index
    }

    /// Sequence positions of all events of one kind, time-ordered.
    pub fn of_kind(&self, key: &str) -> &[usize] {
        self.by_kind.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sequence positions of the API traffic for one operation, time-ordered.
    pub fn of_operation(&self, operation: &str) -> &[usize] {
        self.by_api.get(operation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kind keys with at least one event.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_kind.keys().copied()
    }

    /// Operation names with any recorded API traffic.
    pub fn operations(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_api.keys().map(String::as_str)
    }
}

/// Everything one successful load produced. Immutable once built; the next
/// load replaces it as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLog {
    filename: String,
    events: Vec<IndexedEvent>,
    /// Maps input position to sequence position.
    input_to_sequence: Vec<usize>,
    index: LogIndex,
    has_rtc_metrics: bool,
    time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl LoadedLog {
    pub(crate) fn new(
        filename: String,
        events: Vec<IndexedEvent>,
        index: LogIndex,
        has_rtc_metrics: bool,
        time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Self {
        let mut input_to_sequence = vec![0; events.len()];
        for event in &events {
            input_to_sequence[event.original_order] = event.sequence_index;
        }
        Self {
            filename,
            events,
            input_to_sequence,
            index,
            has_rtc_metrics,
            time_range,
        }
    }

    /// Name of the loaded file, as shown in the viewer title bar.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The annotated sequence in time order.
    pub fn events(&self) -> &[IndexedEvent] {
        &self.events
    }

    /// One event by its sequence position.
    pub fn event(&self, sequence_index: usize) -> Option<&IndexedEvent> {
        self.events.get(sequence_index)
    }

    pub fn index(&self) -> &LogIndex {
        &self.index
    }

    /// Whether the log contains softphone RTC reports. Drives whether the
    /// RTC views are rendered at all.
    pub fn has_rtc_metrics(&self) -> bool {
        self.has_rtc_metrics
    }

    /// Minimum and maximum derived timestamps, when any record has one.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.time_range
    }

    /// Events in the order they appeared in the input file.
    pub fn events_in_input_order(&self) -> impl Iterator<Item = &IndexedEvent> + '_ {
        self.input_to_sequence.iter().map(|&s| &self.events[s])
    }

    /// Events of one kind, time-ordered.
    pub fn events_of_kind(&self, key: &str) -> impl Iterator<Item = &IndexedEvent> + '_ {
        self.index.of_kind(key).iter().map(|&s| &self.events[s])
    }

    /// API request/response events for one operation, time-ordered.
    pub fn api_events(&self, operation: &str) -> impl Iterator<Item = &IndexedEvent> + '_ {
        self.index
            .of_operation(operation)
            .iter()
            .map(|&s| &self.events[s])
    }

    /// (primary, extra) counts for one kind.
    pub fn kind_counts(&self, key: &str) -> (usize, usize) {
        let mut primaries = 0;
        let mut extras = 0;
        for event in self.events_of_kind(key) {
            if event.is_extra {
                extras += 1;
            } else {
                primaries += 1;
            }
        }
        (primaries, extras)
    }
}
