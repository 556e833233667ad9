//! Duplicate ("extra") detection over the time-sorted sequence.
//!
//! The CCP client repeats itself: the agent snapshot poll logs the same
//! snapshot until the agent state changes, and a stuck API call can log its
//! request marker more than once before the response lands. The detector
//! flags those repeats so the snapshot list and the API metrics views can
//! collapse them. A detector is built fresh for every load; its state lives
//! and dies with the pass, so nothing carries over between files.

use crate::event::{EventKind, IndexedEvent};
use std::collections::HashSet;

/// Correlation signature of an API call awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ApiSignature {
    operation: String,
    request_id: Option<String>,
}

/// Per-load pass state for extras detection and RTC presence.
#[derive(Debug, Default)]
pub struct ExtrasDetector {
    /// API requests whose response has not been seen yet.
    pending: HashSet<ApiSignature>,
    /// Signature of the most recent primary snapshot: (state, state_started).
    last_snapshot: Option<(Option<String>, Option<String>)>,
    /// Set once any softphone RTC report is seen.
    has_rtc_metrics: bool,
}

impl ExtrasDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign sequence indices and extra flags in one forward pass.
    ///
    /// Order and count of the sequence are left untouched.
    pub fn annotate(&mut self, events: &mut [IndexedEvent]) {
        for (sequence_index, event) in events.iter_mut().enumerate() {
            event.sequence_index = sequence_index;
            event.is_extra = self.observe(event);
        }
    }

    /// Whether any softphone RTC report was seen during the pass.
    pub fn has_rtc_metrics(&self) -> bool {
        self.has_rtc_metrics
    }

    fn observe(&mut self, event: &IndexedEvent) -> bool {
        match &event.kind {
            EventKind::ApiRequest {
                operation,
                request_id,
            } => {
                let signature = ApiSignature {
                    operation: operation.clone(),
                    request_id: request_id.clone(),
                };
                // A second request with the same signature before the
                // response is a repeat, not a new call.
                !self.pending.insert(signature)
            }
            EventKind::ApiResponse {
                operation,
                request_id,
                ..
            } => {
                self.pending.remove(&ApiSignature {
                    operation: operation.clone(),
                    request_id: request_id.clone(),
                });
                false
            }
            EventKind::Snapshot {
                state,
                state_started,
            } => {
                let signature = (state.clone(), state_started.clone());
                if self.last_snapshot.as_ref() == Some(&signature) {
                    true
                } else {
                    self.last_snapshot = Some(signature);
                    false
                }
            }
            EventKind::RtcMetric => {
                if !self.has_rtc_metrics {
                    log::info!("log contains softphone RTC reports");
                }
                self.has_rtc_metrics = true;
                false
            }
            EventKind::Log => false,
        }
    }
}
