//! Setting descriptor types
//! Type definitions for declarative setting configuration

use crate::key::KeyStroke;

/// Typed value after parsing and validation
/// Setters receive this, never raw host values
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(usize),
    /// Parsed key strokes, duplicates removed
    Keys(Vec<KeyStroke>),
}

/// Setting type definition for parsing and validation
#[derive(Debug, Clone)]
pub enum SettingType {
    /// Boolean setting (engine truthiness: non-zero numbers, `1`/`0` strings)
    Boolean,
    /// Integer setting with optional min/max bounds
    Integer {
        /// Minimum value (inclusive)
        min: Option<usize>,
        /// Maximum value (inclusive)
        max: Option<usize>,
    },
    /// List of key specs such as `<C-p>` or `shift-tab`
    KeyList,
}

/// Structured error for setting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// Host value has the wrong shape
    ParseError(String),
    /// Value failed validation (out of range, etc.)
    ValidationError(String),
}

impl std::fmt::Display for SettingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            SettingError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl From<SettingError> for crate::error::CmdfloatError {
    fn from(err: SettingError) -> Self {
        use crate::error::{CmdfloatError, ErrorType};
        match err {
            SettingError::ParseError(msg) => {
                CmdfloatError::warning(ErrorType::Settings, "SETTING_PARSE_ERROR", msg)
            }
            SettingError::ValidationError(msg) => {
                CmdfloatError::warning(ErrorType::Settings, "SETTING_VALIDATION_ERROR", msg)
            }
        }
    }
}

/// Setter function signature
///
/// Function pointers (not trait objects) for static dispatch.
/// Receives parsed and validated `SettingValue`.
pub type SettingSetter<T> = fn(&mut T, SettingValue) -> Result<(), SettingError>;

/// Setting descriptor
///
/// Name is the host global variable the value is read from.
#[derive(Debug, Clone)]
pub struct SettingDescriptor<T: 'static> {
    /// Global variable name (e.g. `cmdfloat_history_size`)
    pub name: &'static str,
    pub description: &'static str,
    /// Setting type for parsing and validation
    pub ty: SettingType,
    /// Setter function pointer
    pub set: SettingSetter<T>,
}
