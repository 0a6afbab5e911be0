//! Unit tests for log.rs

use std::time::SystemTime;

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

const ALL: [LogSeverity; 5] = [
    LogSeverity::Trace,
    LogSeverity::Debug,
    LogSeverity::Info,
    LogSeverity::Warn,
    LogSeverity::Error,
];

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "ember3d::Texture".to_string(),
        message: "Unsupported channel count (5)".to_string(),
        file,
        line,
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

#[test]
fn test_severities_are_ordered_by_importance() {
    assert!(ALL.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(LogSeverity::default(), LogSeverity::Trace);
}

#[test]
fn test_severity_labels_are_fixed_width() {
    for severity in ALL {
        assert_eq!(severity.label().len(), 5, "{:?}", severity);
    }
    assert_eq!(LogSeverity::Warn.label(), "WARN ");
}

#[test]
fn test_severity_survives_u8_conversion() {
    for severity in ALL {
        assert_eq!(LogSeverity::from_u8(severity as u8), severity);
    }
    assert_eq!(LogSeverity::from_u8(200), LogSeverity::Error);
}

// ============================================================================
// ENTRY
// ============================================================================

#[test]
fn test_location_needs_file_and_line() {
    assert_eq!(entry(LogSeverity::Error, Some("mesh.rs"), Some(12)).location(), Some(("mesh.rs", 12)));
    assert_eq!(entry(LogSeverity::Error, Some("mesh.rs"), None).location(), None);
    assert_eq!(entry(LogSeverity::Info, None, None).location(), None);
}

// ============================================================================
// DEFAULT LOGGER
// ============================================================================

#[test]
fn test_format_plain_without_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Info, None, None));
    assert!(text.contains("[INFO ] [ember3d::Texture]"));
    assert!(text.ends_with("Unsupported channel count (5)"));
}

#[test]
fn test_format_plain_with_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Error, Some("texture.rs"), Some(42)));
    assert!(text.contains("[ERROR]"));
    assert!(text.ends_with("Unsupported channel count (5) (texture.rs:42)"));
}

#[test]
fn test_format_plain_ignores_partial_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Warn, Some("texture.rs"), None));
    assert!(!text.contains("texture.rs"));
}

#[test]
fn test_default_logger_writes_every_severity() {
    for severity in ALL {
        DefaultLogger.log(&entry(severity, Some("log_tests.rs"), Some(1)));
    }
}
