//! Load lifecycle: one session per viewer, one pipeline run per dropped file.
//!
//! The session owns every per-file artifact. Loading a new file rebuilds all
//! of them from scratch; nothing from a previous file survives into the next
//! load. A load is synchronous and all-or-nothing: an unsupported file type
//! leaves the session untouched, any later failure lands in `Empty` with no
//! partial index published. A second in-flight load cannot be expressed at
//! all, since loading needs exclusive access to the session.

use crate::event::RawEvent;
use crate::extras::ExtrasDetector;
use crate::index::{LoadedLog, LogIndex};
use crate::loader::{self, LoadError};
use crate::normalize::{normalize, sort_events, time_range};
use std::path::Path;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No log loaded.
    Empty,
    /// A dropped file is being parsed and indexed.
    Loading,
    /// A log is loaded and queryable.
    Ready,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Empty,
    Loading,
    Ready(LoadedLog),
}

/// Owner of all per-file indexing state.
#[derive(Debug, Default)]
pub struct LogSession {
    state: SessionState,
}

impl LogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Empty => SessionPhase::Empty,
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Ready(_) => SessionPhase::Ready,
        }
    }

    /// The loaded log, when the session is `Ready`.
    pub fn loaded(&self) -> Option<&LoadedLog> {
        match &self.state {
            SessionState::Ready(log) => Some(log),
            _ => None,
        }
    }

    /// Load a log file from disk. The MIME type is inferred from the
    /// file extension.
    pub fn load_path(&mut self, path: &Path) -> Result<&LoadedLog, LoadError> {
        let filename = loader::display_name(path);
        loader::check_file_type(&filename, loader::mime_for_path(path))?;
        self.state = SessionState::Loading;
        match loader::read_log_file(path) {
            Ok(raw) => Ok(self.publish(&filename, raw)),
            Err(e) => {
                self.state = SessionState::Empty;
                Err(e)
            }
        }
    }

    /// Load already-acquired file content, the way a browser drop handler
    /// hands it over together with the reported MIME type.
    pub fn load_content(
        &mut self,
        filename: &str,
        mime: &str,
        content: &str,
    ) -> Result<&LoadedLog, LoadError> {
        loader::check_file_type(filename, mime)?;
        self.state = SessionState::Loading;
        match loader::parse_log(filename, content) {
            Ok(raw) => Ok(self.publish(filename, raw)),
            Err(e) => {
                self.state = SessionState::Empty;
                Err(e)
            }
        }
    }

    /// Run normalize, sort, extras detection, and index construction, then
    /// publish the result as the session's `Ready` state.
    fn publish(&mut self, filename: &str, raw: Vec<RawEvent>) -> &LoadedLog {
        let mut events = normalize(raw);
        sort_events(&mut events);

        let mut detector = ExtrasDetector::new();
        detector.annotate(&mut events);

        let index = LogIndex::build(&events);
        let range = time_range(&events);
        log::info!("indexed {} events from {}", events.len(), filename);

        let loaded = LoadedLog::new(
            filename.to_string(),
            events,
            index,
            detector.has_rtc_metrics(),
            range,
        );
        self.state = SessionState::Ready(loaded);
        let SessionState::Ready(published) = &self.state else {
            unreachable!()
        };
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    const SINGLE_EVENT: &str =
        r#"[{"type":"A","id":1,"time":"2020-01-01T00:00:00Z","text":"hello"}]"#;

    #[test]
    fn test_new_session_is_empty() {
        let session = LogSession::new();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.loaded().is_none());
    }

    #[test]
    fn test_single_event_load() {
        let mut session = LogSession::new();
        let loaded = session
            .load_content("ccp.json", "application/json", SINGLE_EVENT)
            .expect("must load");

        assert_eq!(loaded.events().len(), 1);
        let event = &loaded.events()[0];
        assert_eq!(event.sequence_index, 0);
        assert!(!event.is_extra);
        assert_eq!(event.kind, EventKind::Log);
        assert_eq!(
            event.raw.rest.get("type").and_then(|v| v.as_str()),
            Some("A")
        );

        assert_eq!(loaded.index().of_kind("log"), &[0]);
        let (min, max) = loaded.time_range().expect("range must exist");
        assert_eq!(min, max);
        assert_eq!(min.timestamp_millis(), 1577836800000);
        assert!(!loaded.has_rtc_metrics());
        assert_eq!(loaded.filename(), "ccp.json");
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn test_reloading_the_same_content_is_deterministic() {
        let content = r#"[
            {"text":"AWSClient: -->  calling operation 'getAgentSnapshot'","time":"2020-01-01T00:00:00Z"},
            {"text":"AWSClient: -->  calling operation 'getAgentSnapshot'","time":"2020-01-01T00:00:01Z"},
            {"component":"softphone","text":"STATS REPORT jitter=1ms","time":"2020-01-01T00:00:02Z"}
        ]"#;

        let mut session = LogSession::new();
        let first = session
            .load_content("ccp.json", "application/json", content)
            .expect("must load")
            .clone();
        let second = session
            .load_content("ccp.json", "application/json", content)
            .expect("must load");

        assert_eq!(&first, second);
        let extras: Vec<bool> = second.events().iter().map(|e| e.is_extra).collect();
        assert_eq!(extras, vec![false, true, false]);
        assert!(second.has_rtc_metrics());
    }

    #[test]
    fn test_rtc_flag_does_not_leak_into_the_next_load() {
        let with_rtc =
            r#"[{"component":"softphone","text":"STATS REPORT","time":"2020-01-01T00:00:00Z"}]"#;

        let mut session = LogSession::new();
        session
            .load_content("a.json", "application/json", with_rtc)
            .expect("must load");
        assert!(session.loaded().unwrap().has_rtc_metrics());

        session
            .load_content("b.json", "application/json", SINGLE_EVENT)
            .expect("must load");
        let loaded = session.loaded().unwrap();
        assert!(!loaded.has_rtc_metrics());
        assert_eq!(loaded.filename(), "b.json");
        assert_eq!(loaded.events().len(), 1);
    }

    #[test]
    fn test_unsupported_type_preserves_the_current_state() {
        let mut session = LogSession::new();
        session
            .load_content("ccp.json", "application/json", SINGLE_EVENT)
            .expect("must load");

        let err = session
            .load_content("agent-log.csv", "text/csv", "a,b,c")
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType { .. }));
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.loaded().unwrap().filename(), "ccp.json");
    }

    #[test]
    fn test_parse_failure_discards_the_previous_log() {
        let mut session = LogSession::new();
        session
            .load_content("ccp.json", "application/json", SINGLE_EVENT)
            .expect("must load");

        let err = session
            .load_content("broken.json", "application/json", "[{")
            .unwrap_err();
        assert!(matches!(err, LoadError::ParseError { .. }));
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.loaded().is_none());
    }

    #[test]
    fn test_empty_array_never_reaches_ready() {
        let mut session = LogSession::new();
        let err = session
            .load_content("ccp.json", "application/json", "[]")
            .unwrap_err();
        assert!(matches!(err, LoadError::EmptyLog { .. }));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_text_plain_mime_is_accepted() {
        let mut session = LogSession::new();
        session
            .load_content("ccp.txt", "text/plain", SINGLE_EVENT)
            .expect("must load");
        assert_eq!(session.phase(), SessionPhase::Ready);
    }
}
