//! Centralized error handling for cmdfloat
//! Defines the error taxonomy used at the host-collaborator boundary

pub mod manager;

use std::fmt;

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational message (not really an error)
    Info,
    /// Warning - a feature degraded but the session continues
    Warning,
    /// Standard error - the operation failed, the host is unaffected
    Error,
    /// Critical error - the overlay subsystem must disable itself
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Category of the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// The host modal-editing engine cannot be located or queried
    Unavailable,
    /// An expected host capability is missing or failed when invoked
    Capability,
    /// A search or substitution pattern could not be compiled
    Pattern,
    /// Replaying committed text into the host failed
    Replay,
    /// Configuration value errors
    Settings,
    /// Internal logic or invariant violations
    Internal,
    /// Errors that don't fit other categories
    Other,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Unavailable"),
            Self::Capability => write!(f, "Capability"),
            Self::Pattern => write!(f, "Pattern"),
            Self::Replay => write!(f, "Replay"),
            Self::Settings => write!(f, "Settings"),
            Self::Internal => write!(f, "Internal"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A structured error raised at a collaborator boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdfloatError {
    /// How serious the error is
    pub severity: ErrorSeverity,
    /// What kind of error occurred
    pub kind: ErrorType,
    /// Machine-readable error code (e.g., "HANDLE_KEY_UNSUPPORTED")
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl CmdfloatError {
    /// Create a new standard error (Severity: Error)
    pub fn new(kind: ErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Error,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new critical error (Severity: Critical)
    pub fn critical(kind: ErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Critical,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new warning (Severity: Warning)
    pub fn warning(kind: ErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Warning,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing host capability
    pub fn unsupported(capability: &str) -> Self {
        Self::warning(
            ErrorType::Capability,
            "CAPABILITY_UNSUPPORTED",
            format!("host does not support {capability}"),
        )
    }

    /// Check if the message contains a substring (useful for tests)
    pub fn contains_msg(&self, sub: &str) -> bool {
        self.message.contains(sub)
    }
}

impl fmt::Display for CmdfloatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}({}): {}",
            self.severity, self.kind, self.code, self.message
        )
    }
}

impl std::error::Error for CmdfloatError {}

impl From<String> for CmdfloatError {
    fn from(msg: String) -> Self {
        Self::new(ErrorType::Other, "GENERIC_ERROR", msg)
    }
}

impl From<&str> for CmdfloatError {
    fn from(msg: &str) -> Self {
        Self::new(ErrorType::Other, "GENERIC_ERROR", msg)
    }
}

impl From<regex::Error> for CmdfloatError {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorType::Pattern, "PATTERN_COMPILE_ERROR", err.to_string())
    }
}

/// Result alias for cmdfloat operations
pub type Result<T> = std::result::Result<T, CmdfloatError>;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
