//! Buffers
//!
//! A [`Buffer`] owns the text of one document, its saved state, and the
//! language server session attached to it. Windows refer to buffers by
//! [`BufferId`]; the [`BufferManager`] owns them.

use std::io;
use std::path::{Path, PathBuf};

use lsp_types::{PublishDiagnosticsParams, Uri};
use ropey::Rope;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::constants::{errors, ui};
use crate::error::{ErrorType, SnoError};
use crate::filetype::{FileTypeClassifier, FALLBACK_FILETYPE};
use crate::lsp::diagnostic::collect_reports;
use crate::lsp::{uri_from_path, DiagnosticReport, LspClient};

pub mod manager;

pub use manager::{BufferInfo, BufferManager};

/// Unique identifier for buffers
pub type BufferId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Backed by a file on disk
    File,
    /// Message log; never loaded or saved
    Log,
}

#[derive(Debug)]
pub struct Buffer {
    id: BufferId,
    kind: BufferKind,
    /// Path as the user gave it
    path: Option<PathBuf>,
    /// Absolute form of `path`, computed once
    abs_path: Option<PathBuf>,
    text: Rope,
    /// Text as last read from or written to disk
    saved_text: Rope,
    /// Document version sent to the language server
    version: i32,
    is_new: bool,
    read_only: bool,
    filetype: String,
    lsp: Option<LspClient>,
    listener: Option<CancellationToken>,
    diagnostics: Vec<DiagnosticReport>,
}

/// Absolute form of `path`. Existing files are canonicalized; new ones are
/// joined onto the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// UTF-8 when valid, otherwise each byte as its Latin-1 character
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

impl Buffer {
    /// Unnamed, empty buffer
    pub fn new(id: BufferId) -> Self {
        Buffer {
            id,
            kind: BufferKind::File,
            path: None,
            abs_path: None,
            text: Rope::new(),
            saved_text: Rope::new(),
            version: 0,
            is_new: true,
            read_only: false,
            filetype: FALLBACK_FILETYPE.to_string(),
            lsp: None,
            listener: None,
            diagnostics: Vec::new(),
        }
    }

    /// Buffer for `path`, not yet loaded
    pub fn with_path(id: BufferId, path: impl AsRef<Path>) -> Self {
        let mut buffer = Self::new(id);
        buffer.set_path(path);
        buffer
    }

    /// The message log
    pub fn log(id: BufferId) -> Self {
        Buffer {
            kind: BufferKind::Log,
            is_new: false,
            read_only: true,
            ..Self::new(id)
        }
    }

    // ============================================================
    // Disk
    // ============================================================

    /// Read the file into the buffer.
    ///
    /// A missing file gives an empty new buffer. A file that cannot be
    /// read for lack of permission gives an empty read-only buffer.
    pub async fn load(&mut self) -> Result<(), SnoError> {
        if self.kind == BufferKind::Log {
            return Ok(());
        }
        let path = self.path.clone().ok_or_else(|| {
            SnoError::new(ErrorType::Execution, errors::NO_PATH, errors::MSG_NO_FILE_NAME)
        })?;

        let text = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                self.is_new = false;
                self.read_only = tokio::fs::metadata(&path)
                    .await
                    .map(|m| m.permissions().readonly())
                    .unwrap_or(false);
                decode(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "new file");
                self.is_new = true;
                self.read_only = false;
                String::new()
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                tracing::warn!(path = %path.display(), "no permission to read, opening read-only");
                self.is_new = false;
                self.read_only = true;
                String::new()
            }
            Err(e) => {
                return Err(SnoError::new(
                    ErrorType::Io,
                    errors::LOAD_FAILED,
                    format!("{}: {e}", path.display()),
                ))
            }
        };

        self.text = Rope::from_str(&text);
        self.saved_text = self.text.clone();
        if self.lsp.is_some() {
            self.on_text_changed();
        }
        tracing::debug!(buffer = self.id, path = %path.display(), lines = self.text.len_lines(), "loaded buffer");
        Ok(())
    }

    /// Write the buffer to its path through a temporary file
    pub async fn save(&mut self) -> Result<(), SnoError> {
        if self.kind == BufferKind::Log {
            return Ok(());
        }
        if self.read_only {
            return Err(SnoError::warning(
                ErrorType::Execution,
                errors::READ_ONLY,
                errors::MSG_READ_ONLY,
            ));
        }
        let path = self.path.clone().ok_or_else(|| {
            SnoError::new(ErrorType::Execution, errors::NO_PATH, errors::MSG_NO_FILE_NAME)
        })?;

        self.write_to_file(&path).await?;
        self.saved_text = self.text.clone();
        self.is_new = false;

        if let (Some(client), Some(abs)) = (&self.lsp, &self.abs_path) {
            if let Err(e) = client.save_document(abs) {
                tracing::warn!(buffer = self.id, error = %e, "didSave not sent");
            }
        }
        Ok(())
    }

    /// Write a copy of the text to `path` without changing the buffer
    pub async fn write_to(&self, path: &Path) -> Result<(), SnoError> {
        self.write_to_file(path).await
    }

    /// Replace the file at `path` atomically. Symlinks are followed so the
    /// link survives and its target gets the text, and an existing file
    /// keeps its permissions.
    async fn write_to_file(&self, path: &Path) -> Result<(), SnoError> {
        let failed = |e: io::Error| {
            SnoError::new(
                ErrorType::Io,
                errors::SAVE_FAILED,
                format!("{}: {e}", path.display()),
            )
        };

        let target = tokio::fs::canonicalize(path)
            .await
            .unwrap_or_else(|_| path.to_path_buf());
        let permissions = tokio::fs::metadata(&target)
            .await
            .ok()
            .map(|m| m.permissions());

        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp_path = parent.join(format!(
            ".{}.tmp",
            target
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("file")
        ));

        let mut bytes = Vec::with_capacity(self.text.len_bytes());
        for chunk in self.text.chunks() {
            bytes.extend_from_slice(chunk.as_bytes());
        }

        let written: io::Result<()> = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            if let Some(permissions) = permissions {
                tokio::fs::set_permissions(&temp_path, permissions).await?;
            }
            tokio::fs::rename(&temp_path, &target).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(failed(e));
        }
        tracing::debug!(buffer = self.id, path = %target.display(), "wrote buffer");
        Ok(())
    }

    /// Re-run filetype detection on the current path and text
    pub fn reindex(&mut self, classifier: &dyn FileTypeClassifier) {
        self.filetype = match &self.path {
            Some(path) => classifier.classify(path, &self.text.to_string()),
            None => FALLBACK_FILETYPE.to_string(),
        };
    }

    // ============================================================
    // Editing
    // ============================================================

    /// Bump the version and send the full text to the language server.
    /// Never waits on the server.
    pub fn on_text_changed(&mut self) {
        self.version += 1;
        if let (Some(client), Some(abs)) = (&self.lsp, &self.abs_path) {
            let text = self.text.to_string();
            if let Err(e) = client.change_document(abs, self.version, &text, Some(true)) {
                tracing::warn!(buffer = self.id, version = self.version, error = %e, "didChange not sent");
            }
        }
    }

    /// Insert `text` at char index `at`, clamped to the end
    pub fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.text.len_chars());
        self.text.insert(at, text);
        self.on_text_changed();
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = Rope::from_str(text);
        self.on_text_changed();
    }

    /// Append one line to the end of the text
    pub fn append_line(&mut self, line: &str) {
        let end = self.text.len_chars();
        if end > 0 && self.text.char(end - 1) != '\n' {
            self.text.insert_char(end, '\n');
        }
        let end = self.text.len_chars();
        self.text.insert(end, line);
        self.text.insert_char(end + line.chars().count(), '\n');
        self.on_text_changed();
    }

    /// Drop whole lines from the start until at most `max` remain
    pub fn keep_last_lines(&mut self, max: usize) {
        let mut lines = self.text.len_lines();
        // A trailing newline leaves an empty last line that is not counted
        if self.text.len_chars() > 0 && self.text.char(self.text.len_chars() - 1) == '\n' {
            lines -= 1;
        }
        let excess = lines.saturating_sub(max);
        if excess == 0 {
            return;
        }
        let end = self.text.line_to_char(excess);
        self.text.remove(0..end);
        self.on_text_changed();
    }

    // ============================================================
    // Language server
    // ============================================================

    /// Attach `client` and open the document on it with the current
    /// version. `listener` stops the diagnostics subscription on close.
    pub fn bind_lsp(&mut self, client: LspClient, listener: Option<CancellationToken>) -> Result<(), SnoError> {
        let abs = self.abs_path.clone().ok_or_else(|| {
            SnoError::new(ErrorType::Lsp, errors::NO_PATH, errors::MSG_NO_FILE_NAME)
        })?;
        client.open_document(&self.filetype, &abs, &self.text.to_string(), self.version)?;
        tracing::info!(buffer = self.id, server = %client.server(), filetype = %self.filetype, "attached language server");
        if let Some(old) = self.listener.replace(listener.unwrap_or_default()) {
            old.cancel();
        }
        self.lsp = Some(client);
        Ok(())
    }

    /// Drop the binding without telling the server, for a client that is
    /// already gone. Stops the diagnostics subscription.
    pub fn unbind_lsp(&mut self) -> Option<LspClient> {
        if let Some(listener) = self.listener.take() {
            listener.cancel();
        }
        self.diagnostics.clear();
        let client = self.lsp.take()?;
        tracing::info!(buffer = self.id, server = %client.server(), "detached language server");
        Some(client)
    }

    pub fn lsp(&self) -> Option<&LspClient> {
        self.lsp.as_ref()
    }

    /// `file://` URI of the document, for matching server notifications
    pub fn uri(&self) -> Option<Uri> {
        uri_from_path(self.abs_path.as_deref()?).ok()
    }

    /// Replace the reports wholesale
    pub fn set_diagnostics(&mut self, reports: Vec<DiagnosticReport>) {
        self.diagnostics = reports;
    }

    /// Take a `publishDiagnostics` notification if it is for this
    /// document. Returns whether it was.
    pub fn apply_diagnostics(&mut self, params: &PublishDiagnosticsParams) -> bool {
        if self.uri().as_ref() != Some(&params.uri) {
            return false;
        }
        self.set_diagnostics(collect_reports(&params.diagnostics));
        true
    }

    pub fn diagnostics(&self) -> &[DiagnosticReport] {
        &self.diagnostics
    }

    /// Tell the server the document is gone. The client itself stays up
    /// for other buffers.
    pub fn close(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.cancel();
        }
        if let (Some(client), Some(abs)) = (self.lsp.take(), &self.abs_path) {
            if let Err(e) = client.close_document(abs) {
                tracing::debug!(buffer = self.id, error = %e, "didClose not sent");
            }
        }
        self.diagnostics.clear();
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }

    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.abs_path = Some(normalize_path(path));
        self.path = Some(path.to_path_buf());
    }

    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn filetype(&self) -> &str {
        &self.filetype
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Text matches what is on disk
    pub fn is_saved(&self) -> bool {
        self.kind == BufferKind::Log || self.text == self.saved_text
    }

    pub fn is_dirty(&self) -> bool {
        !self.is_saved()
    }

    /// File name when `short`, otherwise the path as given
    pub fn display_name(&self, short: bool) -> String {
        if self.kind == BufferKind::Log {
            return ui::MESSAGES_BUFFER.to_string();
        }
        let Some(path) = &self.path else {
            return ui::NO_NAME.to_string();
        };
        if short {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        } else {
            path.display().to_string()
        }
    }
}
