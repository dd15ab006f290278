//! Engine logging
//!
//! Every message goes through one process-wide `Logger` (see `Engine`).
//! Sources are plain strings, usually a `LogScope` path such as
//! `hg::headless::ForwardPipeline::MeshProcessor`. Error entries also carry
//! the file and line they were logged from.

use std::fmt;
use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;

/// Sink for engine log entries
///
/// ```no_run
/// use hg_engine::hg::log::{LogEntry, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{} {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One message as handed to the logger
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Scope path of the emitter
    pub source: String,
    pub message: String,
    /// Set for `engine_error!` entries only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in printed lines
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Console logger, one coloured line per entry:
/// `[time] [LEVEL] [source] message (file:line)`
pub struct DefaultLogger {
    min_severity: LogSeverity,
}

impl DefaultLogger {
    /// Logger printing everything from `Debug` upwards
    pub fn new() -> Self {
        Self { min_severity: LogSeverity::Debug }
    }

    /// Logger printing only entries at or above `min_severity`
    pub fn with_min_severity(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    /// Printed line without colours (tests, file sinks)
    pub fn format_plain(entry: &LogEntry) -> String {
        Self::format_line(entry, entry.severity.label(), &entry.source)
    }

    fn format_line(entry: &LogEntry, severity: impl fmt::Display, source: impl fmt::Display) -> String {
        let local: DateTime<Local> = entry.timestamp.into();
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            local.format("%Y-%m-%d %H:%M:%S%.3f"),
            severity,
            source,
            entry.message
        );
        if let (Some(file), Some(number)) = (entry.file, entry.line) {
            line.push_str(&format!(" ({}:{})", file, number));
        }
        line
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.severity < self.min_severity {
            return;
        }
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };
        println!("{}", Self::format_line(entry, severity, entry.source.bright_blue()));
    }
}

// ===== LOG SCOPE =====

/// Named logging scope, passed explicitly to whatever logs
///
/// Scopes nest with `::`. A processor owned by a pipeline typically stores
/// `pipeline_scope.child("MeshProcessor")` and logs through `scope.as_str()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogScope {
    path: String,
}

impl LogScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self { path: name.into() }
    }

    /// Nested scope `self::name`
    pub fn child(&self, name: &str) -> Self {
        Self { path: format!("{}::{}", self.path, name) }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for LogScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for LogScope {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

// ===== MACROS =====

/// Trace-level entry from `source`
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_trace;
/// engine_trace!("hg::Pipeline", "Entering render pass");
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::hg::Engine::log(
            $crate::hg::log::LogSeverity::Trace,
            ::core::convert::AsRef::<str>::as_ref(&$source),
            format!($($arg)*)
        )
    };
}

/// Debug-level entry from `source`
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_debug;
/// engine_debug!("hg::Pipeline", "Registered {} processors", 5);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::hg::Engine::log(
            $crate::hg::log::LogSeverity::Debug,
            ::core::convert::AsRef::<str>::as_ref(&$source),
            format!($($arg)*)
        )
    };
}

/// Info-level entry from `source`
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_info;
/// engine_info!("hg::Renderer", "Pipeline initialized successfully");
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::hg::Engine::log(
            $crate::hg::log::LogSeverity::Info,
            ::core::convert::AsRef::<str>::as_ref(&$source),
            format!($($arg)*)
        )
    };
}

/// Warn-level entry from `source`
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_warn;
/// engine_warn!("hg::Pipeline", "No renderer for {}", "Sprite");
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::hg::Engine::log(
            $crate::hg::log::LogSeverity::Warn,
            ::core::convert::AsRef::<str>::as_ref(&$source),
            format!($($arg)*)
        )
    };
}

/// Error-level entry from `source`, tagged with the call site
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_error;
/// engine_error!("hg::ResourceCache", "Unknown block released: {}", 42);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::hg::Engine::log_detailed(
            $crate::hg::log::LogSeverity::Error,
            ::core::convert::AsRef::<str>::as_ref(&$source),
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
