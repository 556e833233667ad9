//! File acceptance and JSON parsing for dropped log files.
//!
//! The gate mirrors what the viewer enforces at drop time: only plain-text
//! and JSON files are considered, and the content must be a JSON array of
//! log records. Every rejection names the offending file so it can be shown
//! to the user as-is.

use crate::event::RawEvent;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// MIME types accepted for a dropped log file.
pub const ALLOWED_MIME_TYPES: [&str; 2] = ["text/plain", "application/json"];

/// Why a load was rejected.
#[derive(Debug)]
pub enum LoadError {
    /// The file's MIME type is not in [`ALLOWED_MIME_TYPES`].
    UnsupportedType { filename: String, mime: String },
    /// The file could not be read.
    FileReadError { filename: String, detail: String },
    /// The content is not a JSON array of log records.
    ParseError { filename: String, detail: String },
    /// The file parsed but contains no records.
    EmptyLog { filename: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::UnsupportedType { filename, mime } => {
                write!(f, "Unsupported file type for {}: {}", filename, mime)
            }
            LoadError::FileReadError { filename, detail } => {
                write!(f, "Failed to read {}: {}", filename, detail)
            }
            LoadError::ParseError { filename, detail } => {
                write!(f, "Failed to parse {}: {}", filename, detail)
            }
            LoadError::EmptyLog { filename } => {
                write!(f, "{} contains no log records", filename)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Infer the MIME type a browser would report for this path.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => "application/json",
        Some("txt") | Some("log") => "text/plain",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        _ => "application/octet-stream",
    }
}

/// Filename to show in user-facing messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Gate a file on its MIME type before anything is read.
pub fn check_file_type(filename: &str, mime: &str) -> Result<(), LoadError> {
    if ALLOWED_MIME_TYPES.contains(&mime) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedType {
            filename: filename.to_string(),
            mime: mime.to_string(),
        })
    }
}

/// Parse file content as a JSON array of records.
pub fn parse_log(filename: &str, content: &str) -> Result<Vec<RawEvent>, LoadError> {
    let events: Vec<RawEvent> = serde_json::from_str(content)
        .context("expected a JSON array of log records")
        .map_err(|e| LoadError::ParseError {
            filename: filename.to_string(),
            detail: format!("{:#}", e),
        })?;
    if events.is_empty() {
        return Err(LoadError::EmptyLog {
            filename: filename.to_string(),
        });
    }
    log::debug!("parsed {} records from {}", events.len(), filename);
    Ok(events)
}

/// Read and parse a log file from disk, gating on the inferred MIME type.
pub fn read_log_file(path: &Path) -> Result<Vec<RawEvent>, LoadError> {
    let filename = display_name(path);
    check_file_type(&filename, mime_for_path(path))?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .map_err(|e| LoadError::FileReadError {
            filename: filename.clone(),
            detail: format!("{:#}", e),
        })?;
    parse_log(&filename, &content)
}
