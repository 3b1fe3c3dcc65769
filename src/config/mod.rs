//! Editor configuration
//!
//! `Config` is read from `<config dir>/sno/config.toml` and adjusted at
//! runtime through `:set`. Only the options listed in [`definitions`] are
//! settable; language servers come from `[[language_server]]` tables.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{errors, paths};
use crate::error::{ErrorType, SnoError};
use crate::lsp::{ClientOptions, ServerConfig};

pub mod definitions;
pub mod descriptor;
pub mod registry;

pub use definitions::create_settings_registry;
pub use descriptor::{SettingDescriptor, SettingError, SettingType, SettingValue};
pub use registry::SettingsRegistry;

/// Language server timeouts, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LspSettings {
    pub startup_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for LspSettings {
    fn default() -> Self {
        Self {
            startup_timeout_secs: crate::constants::lsp::STARTUP_TIMEOUT.as_secs(),
            request_timeout_secs: crate::constants::lsp::REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colorscheme: String,
    pub color_depth: u32,
    pub use_nerd_icons: bool,
    pub show_line_numbers: bool,
    pub show_relative_numbers: bool,
    pub expandtabs: bool,
    pub tabstop: usize,
    pub show_unprintable_characters: bool,
    pub use_system_clipboard: bool,
    pub lsp: LspSettings,
    #[serde(rename = "language_server")]
    pub language_servers: Vec<ServerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colorscheme: "default".to_string(),
            color_depth: 24,
            use_nerd_icons: false,
            show_line_numbers: true,
            show_relative_numbers: true,
            expandtabs: true,
            tabstop: 4,
            show_unprintable_characters: true,
            use_system_clipboard: true,
            lsp: LspSettings::default(),
            language_servers: Vec::new(),
        }
    }
}

impl Config {
    /// `<config dir>/sno/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::APP_DIR).join(paths::CONFIG_FILE))
    }

    /// Read the config at `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, SnoError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text).map_err(|e| {
                    SnoError::new(
                        ErrorType::Config,
                        errors::CONFIG_PARSE,
                        format!("{}: {}", path.display(), e.message),
                    )
                })?;
                tracing::info!(path = %path.display(), servers = config.language_servers.len(), "loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(SnoError::new(
                ErrorType::Config,
                errors::LOAD_FAILED,
                format!("{}: {e}", path.display()),
            )),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self, SnoError> {
        let config: Config = toml::from_str(text).map_err(|e| {
            SnoError::new(ErrorType::Config, errors::CONFIG_PARSE, e.message().to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SnoError> {
        let invalid = |msg: &str| SnoError::new(ErrorType::Config, errors::CONFIG_PARSE, msg);
        if self.tabstop == 0 {
            return Err(invalid("tabstop must be greater than 0"));
        }
        if !matches!(self.color_depth, 8 | 24) {
            return Err(invalid("color_depth must be 8 or 24"));
        }
        if let Some(server) = self.language_servers.iter().find(|s| s.command.is_empty()) {
            return Err(SnoError::new(
                ErrorType::Config,
                errors::CONFIG_PARSE,
                format!("language server '{}' has no command", server.language_id),
            ));
        }
        Ok(())
    }

    /// Client timeouts from the `[lsp]` table
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            startup_timeout: Duration::from_secs(self.lsp.startup_timeout_secs),
            request_timeout: Duration::from_secs(self.lsp.request_timeout_secs),
        }
    }
}
