//! Setting descriptor types
//! Type definitions for declarative `:set` options

use std::fmt;

use crate::error::{ErrorType, SnoError};

/// Typed value after parsing and validation
/// Setters receive this, never raw strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Integer(usize),
    /// Canonical enum variant
    Enum(String),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Enum(s) | Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Setting type for parsing and validation
#[derive(Debug, Clone)]
pub enum SettingType {
    /// true/false, on/off, yes/no, 1/0
    Boolean,
    /// Integer with optional inclusive bounds
    Integer {
        min: Option<usize>,
        max: Option<usize>,
    },
    Enum {
        variants: &'static [&'static str],
    },
    /// Free-form string
    Text,
}

impl SettingType {
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }
}

/// Structured error for setting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// Failed to parse string value
    ParseError(String),
    /// Value failed validation (out of range, etc.)
    ValidationError(String),
    UnknownOption(String),
    AmbiguousOption { prefix: String, matches: Vec<String> },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            SettingError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            SettingError::UnknownOption(name) => write!(f, "Unknown option: {name}"),
            SettingError::AmbiguousOption { prefix, matches } => {
                write!(f, "Ambiguous option '{prefix}': matches {}", matches.join(", "))
            }
        }
    }
}

impl std::error::Error for SettingError {}

impl From<SettingError> for SnoError {
    fn from(err: SettingError) -> Self {
        let message = err.to_string();
        match err {
            SettingError::ParseError(_) => {
                SnoError::new(ErrorType::Parse, "SETTING_PARSE_ERROR", message)
            }
            SettingError::ValidationError(_) => {
                SnoError::new(ErrorType::Settings, "SETTING_VALIDATION_ERROR", message)
            }
            SettingError::UnknownOption(_) => {
                SnoError::new(ErrorType::Settings, "UNKNOWN_SETTING", message)
            }
            SettingError::AmbiguousOption { .. } => {
                SnoError::new(ErrorType::Settings, "AMBIGUOUS_SETTING", message)
            }
        }
    }
}

/// Setter function signature
///
/// Function pointers (not trait objects) for static dispatch.
/// Receives a parsed and validated `SettingValue`, never raw strings.
pub type SettingSetter<T> = fn(&mut T, SettingValue) -> Result<(), SettingError>;

/// Getter used by `:set name` and the option listing
pub type SettingGetter<T> = fn(&T) -> SettingValue;

/// Setting descriptor
#[derive(Debug, Clone)]
pub struct SettingDescriptor<T: 'static> {
    /// Canonical setting name (e.g., "expandtabs")
    pub name: &'static str,
    /// Short aliases (e.g., &["et"])
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub ty: SettingType,
    pub set: SettingSetter<T>,
    pub get: SettingGetter<T>,
}

impl<T: 'static> SettingDescriptor<T> {
    /// `name=value`, or `name` / `noname` for booleans
    pub fn describe(&self, target: &T) -> String {
        match (self.get)(target) {
            SettingValue::Bool(true) => self.name.to_string(),
            SettingValue::Bool(false) => format!("no{}", self.name),
            value => format!("{}={value}", self.name),
        }
    }
}
