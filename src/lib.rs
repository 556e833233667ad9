//! Parsing and indexing core of an Amazon Connect CCP diagnostic log viewer.
//!
//! A CCP diagnostic log is a JSON array of client records. One load runs the
//! whole pipeline synchronously: parse, normalize (original order plus a
//! derived timestamp), time-sort, flag duplicate "extra" events, and build
//! lookup indices for the metrics views. The UI layer is an external
//! consumer: it holds a [`LogSession`], feeds it dropped files, and queries
//! the [`LoadedLog`] the session publishes.

pub mod classify;
pub mod event;
pub mod extras;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod session;

pub use event::{EventKind, IndexedEvent, RawEvent};
pub use extras::ExtrasDetector;
pub use index::{LoadedLog, LogIndex};
pub use loader::{ALLOWED_MIME_TYPES, LoadError};
pub use session::{LogSession, SessionPhase};
