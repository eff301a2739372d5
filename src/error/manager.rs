//! Failure log
//! Reports collaborator failures through `tracing`, once per failure signature

use std::collections::HashSet;

use crate::error::{CmdfloatError, ErrorSeverity};

/// Remembers which failure signatures were already reported
///
/// Capability probes can fail on every keystroke; only the first failure for
/// a given signature reaches the log.
#[derive(Debug, Default)]
pub struct FailureLog {
    seen: HashSet<String>,
}

impl FailureLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `err` under `signature`. Returns `true` if it was logged.
    pub fn report(&mut self, signature: impl Into<String>, err: &CmdfloatError) -> bool {
        let signature = signature.into();
        if !self.seen.insert(signature.clone()) {
            return false;
        }
        match err.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error | ErrorSeverity::Warning => {
                tracing::warn!(%signature, kind = %err.kind, code = %err.code, "{}", err.message);
            }
            ErrorSeverity::Info => {
                tracing::info!(%signature, code = %err.code, "{}", err.message);
            }
        }
        true
    }

    /// Whether `signature` was already reported
    #[must_use]
    pub fn has_reported(&self, signature: &str) -> bool {
        self.seen.contains(signature)
    }

    /// Number of distinct signatures reported so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
