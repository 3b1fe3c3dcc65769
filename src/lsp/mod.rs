//! Language server support
//!
//! One [`LspClient`] drives one server subprocess over JSON-RPC on stdio.
//! [`LanguageClientManager`] pools clients so each language gets one
//! server per project root.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lsp_types::Uri;

pub mod client;
pub mod diagnostic;
pub mod manager;
pub mod protocol;

pub use client::{ClientOptions, ClientState, LspClient, NotificationStream, ServerNotification};
pub use diagnostic::{DiagnosticReport, ReportSeverity};
pub use manager::{LanguageClientManager, ProcessLauncher, ServerConfig, ServerLauncher};

/// Errors raised by the language server layer
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LspError {
    /// The server could not complete the initialize handshake
    #[error("language server '{server}' failed to start: {reason}")]
    StartupFailed { server: String, reason: String },
    /// The server process went away while a caller was waiting on it
    #[error("language server crashed")]
    Crashed,
    /// A request got no answer in time
    #[error("request '{0}' timed out")]
    Timeout(String),
    /// The server binary could not be spawned
    #[error("failed to spawn '{server}': {reason}")]
    ServerSpawn { server: String, reason: String },
    /// The server answered with a JSON-RPC error
    #[error("server error {code}: {message}")]
    Response { code: i64, message: String },
    /// Operation not allowed in the client's current lifecycle state
    #[error("client is {0}")]
    InvalidState(ClientState),
    /// Malformed frame or message
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The manager has been shut down and starts no more servers
    #[error("language services are stopped")]
    ServiceStopped,
    /// Path that has no `file://` form
    #[error("cannot build a file URI for {0}")]
    InvalidUri(PathBuf),
}

pub type Result<T, E = LspError> = std::result::Result<T, E>;

/// Converts a filesystem path to an LSP URI.
///
/// Relative paths are resolved against the current directory.
pub fn uri_from_path(path: &Path) -> Result<Uri> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let url = url::Url::from_file_path(&absolute)
        .map_err(|()| LspError::InvalidUri(absolute.clone()))?;
    Uri::from_str(url.as_str()).map_err(|_| LspError::InvalidUri(absolute))
}

/// Converts a `file://` LSP URI back to a path.
pub fn path_from_uri(uri: &Uri) -> Option<PathBuf> {
    let url = url::Url::parse(uri.as_str()).ok()?;
    url.to_file_path().ok()
}
