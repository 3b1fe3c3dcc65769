//! Global constants for the sno editor

pub mod paths {
    /// Application directory name under the platform config/cache dirs
    pub const APP_DIR: &str = "sno";
    /// Config file name inside the config directory
    pub const CONFIG_FILE: &str = "config.toml";
    /// Log file name inside the cache directory
    pub const LOG_FILE: &str = "sno.log";
    /// Environment variable holding the log filter
    pub const LOG_ENV: &str = "SNO_LOG";
}

pub mod ui {
    /// Display text for buffers with no file path
    pub const NO_NAME: &str = "[No Name]";
    /// Name of the non-persistent message log buffer
    pub const MESSAGES_BUFFER: &str = "[Messages]";
    /// Lines the message log keeps; older ones are dropped
    pub const MESSAGE_LOG_LINES: usize = 1000;
    /// Separator drawn between stacked windows
    pub const HORIZONTAL_SEPARATOR: char = '─';
    /// Separator drawn between side-by-side windows
    pub const VERTICAL_SEPARATOR: char = '│';
    /// First tab glyph
    pub const TAB_CHAR: char = '|';
    /// Tab fill glyph with nerd icons
    pub const TAB_FILL_NERD: char = '┈';
    /// Tab fill glyph without nerd icons
    pub const TAB_FILL: char = '.';
}

pub mod lsp {
    use std::time::Duration;

    /// Bound on the initialize handshake
    pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);
    /// Bound on a single request round trip
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
    /// Bound on the shutdown response during exit
    pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
    /// Time the server gets to exit on its own after `exit`
    pub const EXIT_GRACE: Duration = Duration::from_millis(500);

    /// Largest message body accepted from a server
    pub const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

    /// JSON-RPC method not found
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

pub mod errors {
    // Error Codes
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    pub const SAVE_FAILED: &str = "SAVE_FAILED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const UNSAVED_CHANGES: &str = "UNSAVED_CHANGES";
    pub const NO_PATH: &str = "NO_PATH";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const INVALID_WINDOW_OPERATION: &str = "INVALID_WINDOW_OPERATION";
    pub const BUFFER_NOT_FOUND: &str = "BUFFER_NOT_FOUND";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    pub const AMBIGUOUS_COMMAND: &str = "AMBIGUOUS_COMMAND";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
    pub const LSP_STARTUP_FAILED: &str = "LSP_STARTUP_FAILED";
    pub const LSP_CRASHED: &str = "LSP_CRASHED";
    pub const LSP_ERROR: &str = "LSP_ERROR";

    // Error Messages
    pub const MSG_NO_FILE_NAME: &str = "No file name";
    pub const MSG_READ_ONLY: &str = "File is read-only";

    /// Unsaved changes message naming the offending buffer
    pub fn unsaved_changes(name: &str) -> String {
        format!("No write since last change for buffer \"{name}\" (add ! to override)")
    }
}
