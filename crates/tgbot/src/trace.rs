//! Debug trace file: one line per call, appended to `<log_dir>/telegram.log`.
//!
//! Failures to open or write the file are reported through `log::warn!` and
//! never reach the caller.

use log::warn;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TRACE_FILE_NAME: &str = "telegram.log";

/// A single trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLine<'a> {
    /// Raw response body.
    Response(&'a str),
    /// Transport failure description.
    TransportError(&'a str),
}

impl fmt::Display for TraceLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceLine::Response(body) => write!(f, "[TRACE]:{}", body),
            TraceLine::TransportError(msg) => write!(f, "[TRANSPORT ERROR]: {}", msg),
        }
    }
}

/// Trace sink gated on debug mode and an existing log directory.
#[derive(Debug, Clone, Copy)]
pub struct TraceLog<'a> {
    enabled: bool,
    dir: Option<&'a Path>,
}

impl<'a> TraceLog<'a> {
    pub fn new(enabled: bool, dir: Option<&'a Path>) -> Self {
        Self { enabled, dir }
    }

    /// Path of the trace file when tracing is active, `None` otherwise.
    pub fn target(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        self.dir
            .filter(|d| d.is_dir())
            .map(|d| d.join(TRACE_FILE_NAME))
    }

    /// Append `line`. Returns whether it was written.
    pub fn record(&self, line: TraceLine<'_>) -> bool {
        let Some(path) = self.target() else {
            return false;
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| writeln!(file, "{}", line));
        match written {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to write trace file {}: {}", path.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_trace(dir: &Path) -> String {
        std::fs::read_to_string(dir.join(TRACE_FILE_NAME)).unwrap()
    }

    #[test]
    fn line_formats() {
        assert_eq!(TraceLine::Response(r#"{"ok":true}"#).to_string(), r#"[TRACE]:{"ok":true}"#);
        assert_eq!(
            TraceLine::TransportError("connection refused").to_string(),
            "[TRANSPORT ERROR]: connection refused"
        );
    }

    #[test]
    fn disabled_debug_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = TraceLog::new(false, Some(dir.path()));
        assert!(log.target().is_none());
        assert!(!log.record(TraceLine::Response("{}")));
        assert!(!dir.path().join(TRACE_FILE_NAME).exists());
    }

    #[test]
    fn missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nested");
        let log = TraceLog::new(true, Some(&missing));
        assert!(!log.record(TraceLine::Response("{}")));
        assert!(!missing.exists());
    }

    #[test]
    fn file_path_instead_of_directory_is_noop() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let log = TraceLog::new(true, Some(file.path()));
        assert!(log.target().is_none());
        assert!(!log.record(TraceLine::Response("{}")));
    }

    #[test]
    fn no_directory_configured_is_noop() {
        assert!(!TraceLog::new(true, None).record(TraceLine::Response("{}")));
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = TraceLog::new(true, Some(dir.path()));
        assert!(log.record(TraceLine::Response(r#"{"ok":true}"#)));
        assert!(log.record(TraceLine::TransportError("timed out")));
        assert_eq!(
            read_trace(dir.path()),
            "[TRACE]:{\"ok\":true}\n[TRANSPORT ERROR]: timed out\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_file_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the trace file should be makes the open fail.
        std::fs::create_dir(dir.path().join(TRACE_FILE_NAME)).unwrap();
        let log = TraceLog::new(true, Some(dir.path()));
        assert!(!log.record(TraceLine::Response("{}")));
    }
}
