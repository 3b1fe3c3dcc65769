//! Language client pool
//!
//! ## lsp/manager Invariants
//!
//! - At most one server runs per (language, root) pair.
//! - Concurrent `get_client` calls for the same pair share one start.
//! - A failed start is remembered until `reset`; a crashed client is
//!   replaced on the next `get_client`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::notification::{LogMessage, ShowMessage};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::client::{ClientOptions, LspClient, ServerNotification};
use super::{LspError, Result};

/// How to run the server for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Language id sent in `didOpen`
    pub language_id: String,
    /// File extensions served, with or without the leading dot
    pub extensions: Vec<String>,
    /// Executable to launch
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ServerConfig {
    pub fn new(
        language_id: impl Into<String>,
        extensions: &[&str],
        command: impl Into<String>,
    ) -> Self {
        Self {
            language_id: language_id.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Whether files with extension `ext` (no leading dot) belong here
    pub fn serves_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.strip_prefix('.').unwrap_or(e) == ext)
    }
}

/// Starts language servers. The default implementation spawns processes;
/// tests substitute in-memory servers.
#[async_trait]
pub trait ServerLauncher: Send + Sync {
    async fn launch(
        &self,
        config: &ServerConfig,
        root: &Path,
        options: ClientOptions,
    ) -> Result<LspClient>;
}

/// Launches servers as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

#[async_trait]
impl ServerLauncher for ProcessLauncher {
    async fn launch(
        &self,
        config: &ServerConfig,
        root: &Path,
        options: ClientOptions,
    ) -> Result<LspClient> {
        LspClient::start(config, root, options).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SlotKey {
    language_id: String,
    root: PathBuf,
}

enum Slot {
    Empty,
    Running {
        client: LspClient,
        watcher: CancellationToken,
    },
    Failed(String),
}

/// Pools one [`LspClient`] per language and project root
pub struct LanguageClientManager {
    servers: Vec<ServerConfig>,
    slots: Mutex<HashMap<SlotKey, Arc<tokio::sync::Mutex<Slot>>>>,
    launcher: Arc<dyn ServerLauncher>,
    options: ClientOptions,
    stopped: AtomicBool,
}

impl LanguageClientManager {
    pub fn new(options: ClientOptions) -> Self {
        Self::with_launcher(Arc::new(ProcessLauncher), options)
    }

    pub fn with_launcher(launcher: Arc<dyn ServerLauncher>, options: ClientOptions) -> Self {
        Self {
            servers: Vec::new(),
            slots: Mutex::new(HashMap::new()),
            launcher,
            options,
            stopped: AtomicBool::new(false),
        }
    }

    /// Register a server. Earlier registrations win when extensions overlap.
    pub fn add_server(&mut self, config: ServerConfig) {
        self.servers.push(config);
    }

    pub fn servers(&self) -> &[ServerConfig] {
        &self.servers
    }

    /// Server configuration for `file_path`, by extension
    pub fn server_config(&self, file_path: &Path) -> Option<&ServerConfig> {
        let ext = file_path.extension()?.to_str()?;
        self.servers.iter().find(|c| c.serves_extension(ext))
    }

    fn slot(&self, key: SlotKey) -> Arc<tokio::sync::Mutex<Slot>> {
        self.slots
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Slot::Empty)))
            .clone()
    }

    /// Client serving `file_path` under `root`, starting one if needed.
    ///
    /// `Ok(None)` when no server is configured for the file.
    pub async fn get_client(&self, file_path: &Path, root: &Path) -> Result<Option<LspClient>> {
        let Some(config) = self.server_config(file_path) else {
            return Ok(None);
        };
        if self.stopped.load(Ordering::Acquire) {
            return Err(LspError::ServiceStopped);
        }
        let slot = self.slot(SlotKey {
            language_id: config.language_id.clone(),
            root: root.to_path_buf(),
        });

        // Held across the launch: a second caller waits here and then
        // reuses whatever the first one produced.
        let mut guard = slot.lock().await;
        match &*guard {
            Slot::Running { client, .. } if client.is_alive() => return Ok(Some(client.clone())),
            Slot::Failed(reason) => {
                return Err(LspError::StartupFailed {
                    server: config.command.clone(),
                    reason: reason.clone(),
                })
            }
            Slot::Running { .. } | Slot::Empty => {}
        }
        if let Slot::Running { client, watcher } = std::mem::replace(&mut *guard, Slot::Empty) {
            tracing::warn!(server = %client.server(), "language server died, restarting");
            watcher.cancel();
            client.exit().await;
        }

        tracing::info!(language = %config.language_id, root = %root.display(), "starting language server");
        match self.launcher.launch(config, root, self.options).await {
            Ok(client) => {
                let watcher = watch_notifications(&client);
                *guard = Slot::Running {
                    client: client.clone(),
                    watcher,
                };
                Ok(Some(client))
            }
            Err(e) => {
                let reason = match &e {
                    LspError::StartupFailed { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                *guard = Slot::Failed(reason);
                Err(e)
            }
        }
    }

    /// Running client for `file_path`, without starting or waiting.
    pub fn get_client_if_exists(&self, file_path: &Path) -> Option<LspClient> {
        let config = self.server_config(file_path)?;
        let slots: Vec<_> = self
            .slots
            .lock()
            .iter()
            .filter(|(key, _)| key.language_id == config.language_id)
            .map(|(_, slot)| slot.clone())
            .collect();

        slots.iter().find_map(|slot| match &*slot.try_lock().ok()? {
            Slot::Running { client, .. } if client.is_alive() => Some(client.clone()),
            _ => None,
        })
    }

    /// Forget a failed start so the next `get_client` tries again.
    /// Returns whether there was a failure to forget.
    pub async fn reset(&self, file_path: &Path, root: &Path) -> bool {
        let Some(config) = self.server_config(file_path) else {
            return false;
        };
        let key = SlotKey {
            language_id: config.language_id.clone(),
            root: root.to_path_buf(),
        };
        let Some(slot) = self.slots.lock().get(&key).cloned() else {
            return false;
        };
        let mut guard = slot.lock().await;
        if matches!(&*guard, Slot::Failed(_)) {
            *guard = Slot::Empty;
            return true;
        }
        false
    }

    /// Exit every running server. Later `get_client` calls fail with
    /// `ServiceStopped`.
    pub async fn shutdown_all(&self) {
        self.stopped.store(true, Ordering::Release);
        let slots: Vec<_> = self.slots.lock().drain().map(|(_, slot)| slot).collect();
        for slot in slots {
            let mut guard = slot.lock().await;
            if let Slot::Running { client, watcher } = std::mem::replace(&mut *guard, Slot::Empty) {
                watcher.cancel();
                client.exit().await;
            }
        }
    }
}

/// Manager-owned listener that forwards server log traffic to tracing.
fn watch_notifications(client: &LspClient) -> CancellationToken {
    let cancel = CancellationToken::new();
    let mut stream = client.listen_for_notifications(cancel.clone());
    let server = client.server().to_string();

    tokio::spawn(async move {
        loop {
            match stream.next().await {
                Ok(Some(notification)) => log_notification(&server, &notification),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(server = %server, error = %e, "stopped watching language server");
                    break;
                }
            }
        }
    });

    cancel
}

fn log_notification(server: &str, notification: &ServerNotification) {
    if let Some(params) = notification.parse::<LogMessage>() {
        tracing::debug!(server = %server, kind = ?params.typ, "{}", params.message);
    } else if let Some(params) = notification.parse::<ShowMessage>() {
        tracing::info!(server = %server, kind = ?params.typ, "{}", params.message);
    } else {
        tracing::trace!(server = %server, method = %notification.method, "notification");
    }
}
