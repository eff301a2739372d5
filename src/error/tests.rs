//! Tests for cmdfloat error handling

use super::manager::FailureLog;
use super::*;

#[test]
fn test_error_severity_display() {
    assert_eq!(format!("{}", ErrorSeverity::Info), "INFO");
    assert_eq!(format!("{}", ErrorSeverity::Warning), "WARN");
    assert_eq!(format!("{}", ErrorSeverity::Error), "ERROR");
    assert_eq!(format!("{}", ErrorSeverity::Critical), "CRITICAL");
}

#[test]
fn test_error_severity_ordering() {
    assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
    assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
    assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
}

#[test]
fn test_error_type_display() {
    assert_eq!(format!("{}", ErrorType::Unavailable), "Unavailable");
    assert_eq!(format!("{}", ErrorType::Capability), "Capability");
    assert_eq!(format!("{}", ErrorType::Pattern), "Pattern");
    assert_eq!(format!("{}", ErrorType::Replay), "Replay");
    assert_eq!(format!("{}", ErrorType::Settings), "Settings");
}

#[test]
fn test_error_constructors() {
    let err = CmdfloatError::new(ErrorType::Replay, "E001", "replay failed");
    assert_eq!(err.severity, ErrorSeverity::Error);
    assert_eq!(err.code, "E001");

    let err = CmdfloatError::critical(ErrorType::Unavailable, "NO_ENGINE", "gone");
    assert_eq!(err.severity, ErrorSeverity::Critical);

    let err = CmdfloatError::warning(ErrorType::Settings, "W001", "bad value");
    assert_eq!(err.severity, ErrorSeverity::Warning);
    assert_eq!(err.kind, ErrorType::Settings);
}

#[test]
fn test_unsupported_is_capability_warning() {
    let err = CmdfloatError::unsupported("handle_key");
    assert_eq!(err.kind, ErrorType::Capability);
    assert_eq!(err.severity, ErrorSeverity::Warning);
    assert!(err.contains_msg("handle_key"));
}

#[test]
fn test_error_display_format() {
    let err = CmdfloatError::new(ErrorType::Pattern, "BAD", "unclosed group");
    assert_eq!(format!("{err}"), "[ERROR] Pattern(BAD): unclosed group");
}

#[test]
fn test_from_string_and_str() {
    let err: CmdfloatError = "oops".into();
    assert_eq!(err.kind, ErrorType::Other);
    let err: CmdfloatError = String::from("oops").into();
    assert_eq!(err.code, "GENERIC_ERROR");
}

#[test]
fn test_from_regex_error() {
    let re_err = regex::Regex::new("(").unwrap_err();
    let err: CmdfloatError = re_err.into();
    assert_eq!(err.kind, ErrorType::Pattern);
}

#[test]
fn test_failure_log_reports_each_signature_once() {
    let mut log = FailureLog::new();
    let err = CmdfloatError::unsupported("handle_key");
    assert!(log.report("KeyHandler#(char)", &err));
    assert!(!log.report("KeyHandler#(char)", &err));
    assert!(log.report("KeyHandler#missing", &err));
    assert_eq!(log.len(), 2);
    assert!(log.has_reported("KeyHandler#missing"));
}
