//! Centralized error handling for sno
//! Defines common error types, severity levels, and error codes

use std::fmt;

pub mod manager;

pub use manager::ErrorManager;

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational message (not really an error)
    Info,
    /// Warning - something might be wrong but operation can continue
    Warning,
    /// Standard error - operation failed but editor can continue
    Error,
    /// Critical error - may lead to data loss or require restart
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
    /// File system or I/O errors
    Io,
    /// Command line parsing errors
    Parse,
    /// `:set` option errors
    Settings,
    /// Command execution errors
    Execution,
    /// Operations on windows or buffers that are not where the caller expects
    Window,
    /// Language server startup, crash, or protocol errors
    Lsp,
    /// Config file errors
    Config,
    /// Internal logic or invariant violations
    Internal,
    /// Errors that don't fit other categories
    Other,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "IO"),
            Self::Parse => write!(f, "Parse"),
            Self::Settings => write!(f, "Settings"),
            Self::Execution => write!(f, "Execution"),
            Self::Window => write!(f, "Window"),
            Self::Lsp => write!(f, "LSP"),
            Self::Config => write!(f, "Config"),
            Self::Internal => write!(f, "Internal"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A structured error in sno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnoError {
    /// How serious the error is
    pub severity: ErrorSeverity,
    /// What kind of error occurred
    pub kind: ErrorType,
    /// Machine-readable error code (e.g., "READ_ONLY")
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl SnoError {
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

    /// Invalid window or buffer operation; the caller's state is left untouched
    pub fn invalid_window_op(message: impl Into<String>) -> Self {
        Self::new(
            ErrorType::Window,
            crate::constants::errors::INVALID_WINDOW_OPERATION,
            message,
        )
    }

    /// Check if the message contains a substring (useful for tests)
    pub fn contains_msg(&self, sub: &str) -> bool {
        self.message.contains(sub)
    }
}

impl fmt::Display for SnoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}({}): {}",
            self.severity, self.kind, self.code, self.message
        )
    }
}

impl std::error::Error for SnoError {}

impl From<String> for SnoError {
    fn from(msg: String) -> Self {
        Self::new(ErrorType::Other, "GENERIC_ERROR", msg)
    }
}

impl From<&str> for SnoError {
    fn from(msg: &str) -> Self {
        Self::new(ErrorType::Other, "GENERIC_ERROR", msg)
    }
}

impl From<std::io::Error> for SnoError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorType::Io, "IO_ERROR", err.to_string())
    }
}

impl From<crate::lsp::LspError> for SnoError {
    fn from(err: crate::lsp::LspError) -> Self {
        use crate::constants::errors;
        use crate::lsp::LspError;
        let code = match &err {
            LspError::StartupFailed { .. } | LspError::ServerSpawn { .. } => {
                errors::LSP_STARTUP_FAILED
            }
            LspError::Crashed => errors::LSP_CRASHED,
            _ => errors::LSP_ERROR,
        };
        Self::new(ErrorType::Lsp, code, err.to_string())
    }
}

/// Result alias for sno operations
pub type Result<T> = std::result::Result<T, SnoError>;
