//! Normalization and time-ordering of raw log records.
//!
//! Normalizing attaches the original array position and a derived timestamp
//! to each record; sorting then produces the display order every downstream
//! pass and view works with.

use crate::classify::classify;
use crate::event::{IndexedEvent, RawEvent};
use chrono::{DateTime, Utc};

/// Attach original order, derived timestamp, and kind to each record.
///
/// Output length always equals input length. Records whose `time` field is
/// absent or unparseable keep `timestamp = None`; that is not an error.
pub fn normalize(raw: Vec<RawEvent>) -> Vec<IndexedEvent> {
    raw.into_iter()
        .enumerate()
        .map(|(original_order, event)| {
            let timestamp = event.time.as_deref().and_then(parse_time);
            if timestamp.is_none() {
                log::debug!("record {} has no parseable time field", original_order);
            }
            let kind = classify(&event);
            IndexedEvent {
                raw: event,
                kind,
                original_order,
                timestamp,
                sequence_index: 0,
                is_extra: false,
            }
        })
        .collect()
}

/// Parse a client-written time field.
fn parse_time(time: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(time).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Order events by derived timestamp, ties by original order.
///
/// Records without a parseable timestamp sort after all others, also tied by
/// original order. The key is total, so the result is deterministic for
/// identical input.
pub fn sort_events(events: &mut [IndexedEvent]) {
    events.sort_by_key(sort_key);
}

fn sort_key(event: &IndexedEvent) -> (bool, i64, usize) {
    (
        event.timestamp.is_none(),
        event.timestamp_ms().unwrap_or(0),
        event.original_order,
    )
}

/// Minimum and maximum derived timestamps in the log, when any record has one.
pub fn time_range(events: &[IndexedEvent]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut stamps = events.iter().filter_map(|e| e.timestamp);
    let first = stamps.next()?;
    let (min, max) = stamps.fold((first, first), |(min, max), t| (min.min(t), max.max(t)));
    Some((min, max))
}
