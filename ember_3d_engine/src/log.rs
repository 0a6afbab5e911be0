//! Engine logging
//!
//! Every engine message goes through [`Engine::log`](crate::ember3d::Engine::log)
//! to the installed [`Logger`]. Messages below the engine log level are
//! dropped before they reach the logger. The default logger prints colored
//! lines, sending warnings and errors to stderr.
//!
//! Components log under a `ember3d::<Component>` source through the
//! `engine_trace!` … `engine_error!` macros. Errors carry the file and line
//! that raised them.

use std::fmt::Display;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use colored::*;

/// Destination for engine log entries
///
/// # Example
///
/// ```no_run
/// use std::sync::Mutex;
/// use ember_3d_engine::ember3d::Engine;
/// use ember_3d_engine::ember3d::log::{DefaultLogger, Logger, LogEntry};
///
/// struct Journal(Mutex<Vec<String>>);
///
/// impl Logger for Journal {
///     fn log(&self, entry: &LogEntry) {
///         self.0.lock().unwrap().push(DefaultLogger::format_plain(entry));
///     }
/// }
///
/// Engine::set_logger(Journal(Mutex::new(Vec::new())));
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. "ember3d::Texture"
    pub source: String,
    pub message: String,
    /// Set for errors only
    pub file: Option<&'static str>,
    /// Set for errors only
    pub line: Option<u32>,
}

impl LogEntry {
    /// `(file, line)` when both are known
    pub fn location(&self) -> Option<(&'static str, u32)> {
        self.file.zip(self.line)
    }
}

/// Log severity, ordered from most to least verbose
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogSeverity {
    #[default]
    Trace = 0,
    Debug = 1,
    Info = 2,
    /// Recoverable problems: failed shader stages, missing textures
    Warn = 3,
    Error = 4,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }
}

/// Console logger
///
/// Lines look like `[2026-01-01 12:00:00.000] [WARN ] [ember3d::Material] message`,
/// with ` (file:line)` appended when the entry has a location.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry without colors
    pub fn format_plain(entry: &LogEntry) -> String {
        format_line(entry, entry.severity.label(), &entry.source)
    }
}

fn format_line(entry: &LogEntry, severity: impl Display, source: impl Display) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let mut line = format!(
        "[{}] [{}] [{}] {}",
        datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
        severity,
        source,
        entry.message
    );
    if let Some((file, number)) = entry.location() {
        line.push_str(&format!(" ({}:{})", file, number));
    }
    line
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };
        let line = format_line(entry, severity, entry.source.bright_blue());

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::ember3d::Engine::log(
            $crate::ember3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*),
        )
    };
}

/// Log a TRACE message
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Trace, $source, $($arg)*) };
}

/// Log a DEBUG message
///
/// ```no_run
/// # use ember_3d_engine::engine_debug;
/// engine_debug!("ember3d::Mesh", "Uploaded {} vertices", 36);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Debug, $source, $($arg)*) };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Info, $source, $($arg)*) };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Warn, $source, $($arg)*) };
}

/// Log an ERROR message, tagged with the calling file and line
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::ember3d::Engine::log_detailed(
            $crate::ember3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!(),
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
