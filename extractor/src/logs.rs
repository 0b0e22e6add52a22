//! Run log.
//!
//! Level-tagged entries printed to stderr (stdout is reserved for command
//! output) and kept in a bounded history so callers can inspect what a run
//! reported.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Maximum log entries kept in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Prints entries and remembers the most recent ones.
pub struct Logger {
    history: Mutex<VecDeque<LogEntry>>,
    quiet: AtomicBool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)),
            quiet: AtomicBool::new(false),
        }
    }

    pub fn log(&self, entry: LogEntry) {
        if !self.quiet.load(Ordering::Relaxed) {
            eprintln!("{}", entry.render());
        }

        // A poisoned lock only loses history, never the message itself
        if let Ok(mut history) = self.history.lock() {
            if history.len() == MAX_LOG_ENTRIES {
                history.pop_front();
            }
            history.push_back(entry);
        }
    }

    /// Stop (or resume) printing; history is still recorded.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn recent(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let logger = Logger::new();
        logger.set_quiet(true);
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            logger.log(LogEntry::info(format!("entry {}", i)));
        }

        let recent = logger.recent();
        assert_eq!(recent.len(), MAX_LOG_ENTRIES);
        assert_eq!(recent[0].message, "entry 5");
    }

    #[test]
    fn test_render_indent_and_prefix() {
        let line = LogEntry::warning("narrow row").with_indent(1).render();
        assert!(line.starts_with("   "));
        assert!(line.contains("⚠️"));
        assert!(line.ends_with("narrow row"));
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_value(LogEntry::success("ok")).unwrap();
        assert_eq!(json["level"], "success");
    }
}
