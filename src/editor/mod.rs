//! Editor core
//! The editing session that ties buffers, windows and language servers together

mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::buffer::{BufferId, BufferManager};
use crate::command::CommandParser;
use crate::config::{create_settings_registry, Config, SettingsRegistry};
use crate::error::{ErrorManager, SnoError};
use crate::filetype::{FileTypeClassifier, RegexClassifier};
use crate::job_manager::jobs::{DiagnosticsJob, LspAttachJob};
use crate::job_manager::{JobManager, JobMessage};
use crate::lsp::{LanguageClientManager, LspClient};
use crate::notification::NotificationManager;
use crate::split::{SplitDirection, WindowManager};
use crate::window::{default_processors, WindowId};

/// Terminal size assumed until the front end reports one
const DEFAULT_ROWS: usize = 24;
const DEFAULT_COLS: usize = 80;

/// How the files given at startup are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialLayout {
    /// One window listing every file
    #[default]
    Buffers,
    /// One window per file, stacked
    HorizontalSplits,
    /// One window per file, side by side
    VerticalSplits,
}

/// One editing session
pub struct Editor {
    config: Config,
    settings: SettingsRegistry<Config>,
    parser: CommandParser,
    buffers: BufferManager,
    windows: WindowManager,
    errors: ErrorManager,
    clients: Arc<LanguageClientManager>,
    jobs: JobManager,
    classifier: Box<dyn FileTypeClassifier>,
    /// Project root handed to language servers
    root: PathBuf,
    /// First notification id not yet copied to the message log
    logged: u64,
    /// Command output not yet shown (`:ls`, `:set`, `:messages`)
    output: Vec<String>,
    should_quit: bool,
}

impl Editor {
    /// Session whose language servers come from `config`, rooted at the
    /// current directory
    pub fn new(config: Config) -> Self {
        let mut clients = LanguageClientManager::new(config.client_options());
        for server in &config.language_servers {
            clients.add_server(server.clone());
        }
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_clients(config, Arc::new(clients), root)
    }

    pub fn with_clients(config: Config, clients: Arc<LanguageClientManager>, root: PathBuf) -> Self {
        let settings = create_settings_registry();
        Editor {
            windows: WindowManager::new(default_processors(&config), DEFAULT_ROWS, DEFAULT_COLS),
            parser: CommandParser::new(settings),
            settings,
            config,
            buffers: BufferManager::new(),
            errors: ErrorManager::new(),
            clients,
            jobs: JobManager::new(),
            classifier: Box::new(RegexClassifier::default()),
            root,
            logged: 0,
            output: Vec::new(),
            should_quit: false,
        }
    }

    // ============================================================
    // Accessors
    // ============================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffers(&self) -> &BufferManager {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut BufferManager {
        &mut self.buffers
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn notifications(&self) -> &NotificationManager {
        self.errors.notifications()
    }

    pub fn jobs(&self) -> &JobManager {
        &self.jobs
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Buffer shown in the active window
    pub fn active_buffer_id(&self) -> Option<BufferId> {
        self.windows.active_window().map(|w| w.active_buffer())
    }

    pub fn handle_error(&mut self, err: SnoError) {
        self.errors.handle(err);
    }

    fn active_window_id(&self) -> Result<WindowId, SnoError> {
        self.windows
            .active_window_id()
            .ok_or_else(|| SnoError::invalid_window_op("no active window"))
    }

    // ============================================================
    // Startup
    // ============================================================

    /// Build the first windows from the command line files
    pub async fn open_initial(
        &mut self,
        files: &[PathBuf],
        layout: InitialLayout,
    ) -> Result<(), SnoError> {
        let mut opened = Vec::new();
        for file in files {
            match self.open_buffer(file).await {
                Ok(id) => {
                    if !opened.contains(&id) {
                        opened.push(id);
                    }
                }
                Err(e) => self.handle_error(e),
            }
        }
        if opened.is_empty() {
            opened.push(self.buffers.create_empty());
        }

        let first = self.windows.create_window(opened[0])?;
        let direction = match layout {
            InitialLayout::Buffers => {
                if let Some(window) = self.windows.window_mut(first) {
                    for &id in &opened[1..] {
                        window.add_buffer(id);
                    }
                }
                return Ok(());
            }
            InitialLayout::HorizontalSplits => SplitDirection::Horizontal,
            InitialLayout::VerticalSplits => SplitDirection::Vertical,
        };

        let mut previous = first;
        for &id in &opened[1..] {
            previous = self.windows.split(previous, direction, Some(id))?;
        }
        self.windows.focus_window(first)
    }

    /// Buffer for `path`, loading it and starting its language server when
    /// it was not open yet
    pub(crate) async fn open_buffer(&mut self, path: &Path) -> Result<BufferId, SnoError> {
        let (id, created) = self.buffers.open(path).await?;
        if created {
            if let Some(buffer) = self.buffers.get_mut(id) {
                buffer.reindex(self.classifier.as_ref());
            }
            self.attach_language_server(id);
        }
        Ok(id)
    }

    /// Start a language server for `buffer` in the background. Does
    /// nothing when no server is configured for it.
    pub(crate) fn attach_language_server(&mut self, buffer: BufferId) {
        let Some(path) = self
            .buffers
            .get(buffer)
            .and_then(|b| b.abs_path())
            .map(Path::to_path_buf)
        else {
            return;
        };
        if self.clients.server_config(&path).is_none() {
            return;
        }
        self.jobs.spawn(LspAttachJob {
            buffer,
            path,
            root: self.root.clone(),
            manager: self.clients.clone(),
        });
    }

    // ============================================================
    // Background jobs
    // ============================================================

    /// Apply every job message received so far
    pub fn drain_jobs(&mut self) {
        while let Some(msg) = self.jobs.try_recv() {
            self.handle_job_message(msg);
        }
        self.jobs.cleanup_finished_jobs();
    }

    fn handle_job_message(&mut self, msg: JobMessage) {
        self.jobs.update_job_state(&msg);

        match msg {
            JobMessage::Started(_, _) | JobMessage::Finished(_, _) => {}
            JobMessage::Error(id, err) => {
                self.errors
                    .notifications_mut()
                    .warn(format!("Job {id} failed: {err}"));
            }
            JobMessage::Cancelled(id) => {
                tracing::debug!(job = id, "job cancelled");
            }
            JobMessage::LspAttached { buffer, client } => self.bind_client(buffer, client),
            JobMessage::LspUnavailable { buffer, reason } => {
                let Some(reason) = reason else {
                    return;
                };
                let name = self
                    .buffers
                    .get(buffer)
                    .map(|b| b.display_name(true))
                    .unwrap_or_default();
                self.errors
                    .notifications_mut()
                    .warn(format!("No language server for \"{name}\": {reason}"));
            }
            JobMessage::Diagnostics { buffer, reports } => {
                if let Some(buffer) = self.buffers.get_mut(buffer) {
                    buffer.set_diagnostics(reports);
                }
            }
        }
    }

    /// Subscribe to diagnostics, then open the document on the server.
    /// Subscribing first means no report sent in reply to didOpen is lost.
    fn bind_client(&mut self, id: BufferId, client: LspClient) {
        let Some(buffer) = self.buffers.get_mut(id) else {
            return;
        };
        if buffer.lsp().is_some_and(|bound| bound.same_server(&client)) {
            return;
        }
        let Some(uri) = buffer.uri() else {
            return;
        };

        let token = CancellationToken::new();
        let stream = client.listen_for_notifications(token.clone());
        if let Err(e) = buffer.bind_lsp(client, Some(token.clone())) {
            token.cancel();
            self.handle_error(e);
            return;
        }
        self.jobs.spawn_with_cancel(
            DiagnosticsJob {
                buffer: id,
                uri,
                stream,
            },
            token,
        );
    }

    // ============================================================
    // Messages
    // ============================================================

    /// Notifications raised since the last call, formatted as
    /// `[KIND] message`. Each is also appended to the message log, after
    /// which expired notifications are dropped.
    pub fn take_messages(&mut self) -> Vec<String> {
        let lines: Vec<String> = self
            .errors
            .notifications()
            .since(self.logged)
            .map(|n| format!("[{}] {}", n.kind, n.message))
            .collect();
        self.logged = self.errors.notifications().next_id();
        for line in &lines {
            self.buffers.log_message(line);
        }
        self.errors.notifications_mut().prune_expired();
        lines
    }

    /// Command output produced since the last call
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ============================================================
    // Main loop
    // ============================================================

    /// Parse and run one command line, reporting failures as notifications
    pub async fn execute_line(&mut self, line: &str) {
        let command = self.parser.parse(line);
        tracing::debug!(?command, "executing");
        if let Err(e) = self.execute(command).await {
            self.handle_error(e);
        }
    }

    /// Read command lines from `input` until `:qa`, the last window
    /// closing, or end of input. Output and notifications go to `out`.
    pub async fn run<R, W>(&mut self, input: R, mut out: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        self.flush(&mut out).await?;

        while !self.should_quit {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => self.execute_line(&line).await,
                    None => break,
                },
                Some(msg) = self.jobs.recv() => self.handle_job_message(msg),
            }
            self.drain_jobs();
            self.flush(&mut out).await?;
        }

        self.shutdown().await;
        self.flush(&mut out).await
    }

    async fn flush<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> std::io::Result<()> {
        let mut text = String::new();
        for line in self.take_output().into_iter().chain(self.take_messages()) {
            text.push_str(&line);
            text.push('\n');
        }
        if !text.is_empty() {
            out.write_all(text.as_bytes()).await?;
            out.flush().await?;
        }
        Ok(())
    }

    /// Close every document and stop every language server
    pub async fn shutdown(&mut self) {
        tracing::info!(buffers = self.buffers.len(), "shutting down");
        for buffer in self.buffers.iter_mut() {
            buffer.close();
        }
        self.jobs.cancel_all();
        self.clients.shutdown_all().await;
        self.should_quit = true;
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
