//! Language server jobs
//!
//! [`LspAttachJob`] finds or starts the server for a freshly opened
//! buffer. [`DiagnosticsJob`] follows a buffer's diagnostics for as long
//! as the buffer stays bound to its server.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::notification::PublishDiagnostics;
use lsp_types::Uri;
use tokio_util::sync::CancellationToken;

use super::{Job, JobId, JobMessage, JobSender};
use crate::buffer::BufferId;
use crate::lsp::diagnostic::collect_reports;
use crate::lsp::{LanguageClientManager, LspError, NotificationStream};

/// Look up, or start, the language server for a buffer
pub struct LspAttachJob {
    pub buffer: BufferId,
    pub path: PathBuf,
    pub root: PathBuf,
    pub manager: Arc<LanguageClientManager>,
}

impl fmt::Debug for LspAttachJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LspAttachJob")
            .field("buffer", &self.buffer)
            .field("path", &self.path)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Job for LspAttachJob {
    async fn run(self: Box<Self>, id: JobId, sender: JobSender, _cancel: CancellationToken) {
        let message = match self.manager.get_client(&self.path, &self.root).await {
            Ok(Some(client)) => JobMessage::LspAttached {
                buffer: self.buffer,
                client,
            },
            Ok(None) => JobMessage::LspUnavailable {
                buffer: self.buffer,
                reason: None,
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "no language server");
                JobMessage::LspUnavailable {
                    buffer: self.buffer,
                    reason: Some(e.to_string()),
                }
            }
        };
        if sender.send(message).is_ok() {
            let _ = sender.send(JobMessage::Finished(id, true));
        }
    }

    fn is_silent(&self) -> bool {
        true
    }
}

/// Forward `textDocument/publishDiagnostics` for one document.
///
/// Each notification replaces the previous reports. The job ends when
/// its stream is cancelled or the server goes away.
pub struct DiagnosticsJob {
    pub buffer: BufferId,
    pub uri: Uri,
    pub stream: NotificationStream,
}

impl fmt::Debug for DiagnosticsJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsJob")
            .field("buffer", &self.buffer)
            .field("uri", &self.uri.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Job for DiagnosticsJob {
    async fn run(self: Box<Self>, id: JobId, sender: JobSender, _cancel: CancellationToken) {
        let DiagnosticsJob {
            buffer,
            uri,
            mut stream,
        } = *self;
        loop {
            match stream.next().await {
                Ok(Some(notification)) => {
                    let Some(params) = notification.parse::<PublishDiagnostics>() else {
                        continue;
                    };
                    if params.uri != uri {
                        continue;
                    }
                    let reports = collect_reports(&params.diagnostics);
                    tracing::debug!(buffer, count = reports.len(), "diagnostics");
                    let message = JobMessage::Diagnostics { buffer, reports };
                    if sender.send(message).is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    let _ = sender.send(JobMessage::Cancelled(id));
                    return;
                }
                Err(LspError::Crashed) => {
                    let _ = sender.send(JobMessage::Error(
                        id,
                        "language server exited".to_string(),
                    ));
                    return;
                }
                Err(e) => {
                    let _ = sender.send(JobMessage::Error(id, e.to_string()));
                    return;
                }
            }
        }
    }

    fn is_silent(&self) -> bool {
        true
    }
}
