//! Language server client
//!
//! ## lsp/client Invariants
//!
//! - Request ids are unique for the lifetime of a client.
//! - A response resolves exactly one pending waiter; late or unknown
//!   responses are dropped.
//! - Every wait on the server also waits on the process-gone token, so no
//!   caller outlives the server.
//! - Notifications are broadcast: every registered listener sees every one.
//! - `exit` is safe to call any number of times.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument, Exit,
    Initialized, Notification,
};
use lsp_types::request::{Completion, Initialize, Request, Shutdown, SignatureHelpRequest};
use lsp_types::{
    ClientCapabilities, ClientInfo, CompletionClientCapabilities, CompletionContext,
    CompletionItem, CompletionParams, CompletionResponse, CompletionTriggerKind,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, InitializeParams, InitializeResult, InitializedParams, Position,
    PublishDiagnosticsClientCapabilities, ServerCapabilities, SignatureHelp,
    SignatureHelpClientCapabilities, SignatureHelpParams, TextDocumentClientCapabilities,
    TextDocumentContentChangeEvent, TextDocumentIdentifier, TextDocumentItem,
    TextDocumentPositionParams, TextDocumentSyncClientCapabilities, TraceValue,
    VersionedTextDocumentIdentifier, WindowClientCapabilities, WorkspaceFolder,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::manager::ServerConfig;
use super::protocol::{self, Message, ResponseError};
use super::{uri_from_path, LspError, Result};
use crate::constants::lsp::{EXIT_GRACE, REQUEST_TIMEOUT, SHUTDOWN_TIMEOUT, STARTUP_TIMEOUT};

/// Lifecycle of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unstarted,
    Starting,
    Normal,
    ShuttingDown,
    Exited,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => write!(f, "unstarted"),
            Self::Starting => write!(f, "starting"),
            Self::Normal => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting down"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// Timeouts applied by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Bound on the initialize handshake
    pub startup_timeout: Duration,
    /// Bound on every later request
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            startup_timeout: STARTUP_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// A notification pushed by the server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerNotification {
    pub method: String,
    pub params: Value,
}

impl ServerNotification {
    /// Decode the params if this is an `N` notification.
    pub fn parse<N: Notification>(&self) -> Option<N::Params> {
        if self.method != N::METHOD {
            return None;
        }
        match serde_json::from_value(self.params.clone()) {
            Ok(params) => Some(params),
            Err(e) => {
                tracing::warn!(method = %self.method, error = %e, "malformed notification");
                None
            }
        }
    }
}

type PendingReply = std::result::Result<Value, ResponseError>;

struct Listener {
    id: u64,
    tx: mpsc::UnboundedSender<ServerNotification>,
}

/// State shared between the client handle and its I/O pumps
struct Router {
    server: String,
    outbound: mpsc::UnboundedSender<Value>,
    pending: Mutex<HashMap<u64, oneshot::Sender<PendingReply>>>,
    listeners: Mutex<Vec<Listener>>,
    gone: CancellationToken,
}

impl Router {
    fn dispatch(&self, raw: Value) {
        match protocol::classify(raw) {
            Ok(Message::Response { id, result }) => {
                match self.pending.lock().remove(&id) {
                    Some(waiter) => {
                        let _ = waiter.send(result);
                    }
                    None => {
                        tracing::debug!(server = %self.server, id, "response for unknown request")
                    }
                }
            }
            Ok(Message::Notification { method, params }) => {
                tracing::trace!(server = %self.server, %method, "notification");
                let notification = ServerNotification { method, params };
                self.listeners
                    .lock()
                    .retain(|l| l.tx.send(notification.clone()).is_ok());
            }
            Ok(Message::Request { id, method, params }) => {
                tracing::debug!(server = %self.server, %method, "server request, sending default reply");
                let _ = self
                    .outbound
                    .send(protocol::default_reply(id, &method, &params));
            }
            Err(e) => {
                tracing::warn!(server = %self.server, error = %e, "dropping unreadable message");
            }
        }
    }

    /// Marks the server gone and releases everyone waiting on it.
    fn close(&self) {
        self.gone.cancel();
        self.pending.lock().clear();
        self.listeners.lock().clear();
    }
}

struct Inner {
    router: Arc<Router>,
    root: PathBuf,
    state: Mutex<ClientState>,
    next_request_id: AtomicU64,
    next_listener_id: AtomicU64,
    capabilities: Mutex<Option<ServerCapabilities>>,
    child: tokio::sync::Mutex<Option<Child>>,
    pumps: Mutex<Vec<JoinHandle<()>>>,
    options: ClientOptions,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.router.close();
        for pump in self.pumps.get_mut().drain(..) {
            pump.abort();
        }
    }
}

/// Handle to one running language server. Cheap to clone; all clones
/// share the same server.
#[derive(Clone)]
pub struct LspClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for LspClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LspClient")
            .field("server", &self.inner.router.server)
            .field("root", &self.inner.root)
            .field("state", &self.state())
            .finish()
    }
}

impl LspClient {
    /// Spawn the server process and complete the initialize handshake.
    pub async fn start(config: &ServerConfig, root: &Path, options: ClientOptions) -> Result<Self> {
        let server = config.command.clone();
        let spawn_err = |reason: String| LspError::ServerSpawn {
            server: server.clone(),
            reason,
        };

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .current_dir(root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_err(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_err("stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_err("stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| spawn_err("stderr not captured".into()))?;

        tracing::info!(server = %server, root = %root.display(), pid = ?child.id(), "spawned language server");

        let client = Self::with_transport(&server, root, stdout, stdin, Some(child), options);
        client.spawn_stderr_pump(stderr);
        client.handshake().await?;
        Ok(client)
    }

    /// Run a client over an existing byte stream pair and complete the
    /// handshake. There is no process to reap; the stream closing counts
    /// as the server going away.
    pub async fn connect<R, W>(
        server: &str,
        root: &Path,
        reader: R,
        writer: W,
        options: ClientOptions,
    ) -> Result<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let client = Self::with_transport(server, root, reader, writer, None, options);
        client.handshake().await?;
        Ok(client)
    }

    fn with_transport<R, W>(
        server: &str,
        root: &Path,
        reader: R,
        writer: W,
        child: Option<Child>,
        options: ClientOptions,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let router = Arc::new(Router {
            server: server.to_string(),
            outbound,
            pending: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            gone: CancellationToken::new(),
        });

        let writer_pump = tokio::spawn(write_loop(writer, outbound_rx, router.clone()));
        let reader_pump = tokio::spawn(read_loop(BufReader::new(reader), router.clone()));

        LspClient {
            inner: Arc::new(Inner {
                router,
                root: root.to_path_buf(),
                state: Mutex::new(ClientState::Unstarted),
                next_request_id: AtomicU64::new(1),
                next_listener_id: AtomicU64::new(1),
                capabilities: Mutex::new(None),
                child: tokio::sync::Mutex::new(child),
                pumps: Mutex::new(vec![writer_pump, reader_pump]),
                options,
            }),
        }
    }

    fn spawn_stderr_pump<E>(&self, stderr: E)
    where
        E: AsyncRead + Unpin + Send + 'static,
    {
        let server = self.inner.router.server.clone();
        let pump = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        tracing::debug!(target: "sno::lsp::stderr", server = %server, "{}", line.trim_end())
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::debug!(server = %server, error = %e, "stderr closed");
                        break;
                    }
                }
            }
        });
        self.inner.pumps.lock().push(pump);
    }

    /// `initialize` request, capability capture, then `initialized`.
    /// Any failure tears the client down and surfaces as `StartupFailed`.
    async fn handshake(&self) -> Result<()> {
        self.set_state(ClientState::Starting);

        let outcome = async {
            let params = serde_json::to_value(self.initialize_params()?)?;
            let timeout = self.inner.options.startup_timeout;
            let value = self.call(Initialize::METHOD, params, timeout).await?;
            let result: InitializeResult = serde_json::from_value(value)?;
            *self.inner.capabilities.lock() = Some(result.capabilities);
            self.set_state(ClientState::Normal);
            self.notify::<Initialized>(InitializedParams {})
        }
        .await;

        match outcome {
            Ok(()) => {
                tracing::info!(server = %self.server(), "language server initialized");
                Ok(())
            }
            Err(e) => {
                tracing::error!(server = %self.server(), error = %e, "language server startup failed");
                self.exit().await;
                Err(LspError::StartupFailed {
                    server: self.server().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn initialize_params(&self) -> Result<InitializeParams> {
        let root_uri = uri_from_path(&self.inner.root)?;
        let name = self
            .inner
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        #[allow(deprecated)]
        let params = InitializeParams {
            process_id: Some(std::process::id()),
            root_uri: Some(root_uri.clone()),
            workspace_folders: Some(vec![WorkspaceFolder {
                uri: root_uri,
                name,
            }]),
            capabilities: client_capabilities(),
            trace: Some(TraceValue::Verbose),
            client_info: Some(ClientInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..Default::default()
        };
        Ok(params)
    }

    /// Server name used in logs and errors
    pub fn server(&self) -> &str {
        &self.inner.router.server
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Whether both handles drive the same server
    pub fn same_server(&self, other: &LspClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn state(&self) -> ClientState {
        *self.inner.state.lock()
    }

    fn set_state(&self, state: ClientState) -> ClientState {
        std::mem::replace(&mut *self.inner.state.lock(), state)
    }

    /// True while the server process is up and usable.
    pub fn is_alive(&self) -> bool {
        !self.inner.router.gone.is_cancelled()
            && matches!(self.state(), ClientState::Starting | ClientState::Normal)
    }

    /// Capabilities from the initialize result
    pub fn capabilities(&self) -> Option<ServerCapabilities> {
        self.inner.capabilities.lock().clone()
    }

    /// Characters that should trigger signature help
    pub fn signature_triggers(&self) -> Vec<String> {
        self.inner
            .capabilities
            .lock()
            .as_ref()
            .and_then(|c| c.signature_help_provider.as_ref())
            .and_then(|p| p.trigger_characters.clone())
            .unwrap_or_default()
    }

    /// Number of registered notification listeners
    pub fn listener_count(&self) -> usize {
        self.inner.router.listeners.lock().len()
    }

    fn ensure_normal(&self) -> Result<()> {
        if self.inner.router.gone.is_cancelled() {
            return Err(LspError::Crashed);
        }
        match self.state() {
            ClientState::Normal => Ok(()),
            other => Err(LspError::InvalidState(other)),
        }
    }

    /// Send a typed request and wait for its result.
    pub async fn request<R: Request>(&self, params: R::Params) -> Result<R::Result> {
        self.ensure_normal()?;
        let params = serde_json::to_value(params)?;
        let value = self
            .call(R::METHOD, params, self.inner.options.request_timeout)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a typed notification. Never waits on the server.
    pub fn notify<N: Notification>(&self, params: N::Params) -> Result<()> {
        let params = serde_json::to_value(params)?;
        self.send_notification(N::METHOD, params)
    }

    fn send_notification(&self, method: &str, params: Value) -> Result<()> {
        let router = &self.inner.router;
        if router.gone.is_cancelled() {
            return Err(LspError::Crashed);
        }
        router
            .outbound
            .send(protocol::notification(method, params))
            .map_err(|_| LspError::Crashed)
    }

    /// Raw request: allocate an id, park a waiter, and race the answer
    /// against the timeout and the server going away.
    async fn call(&self, method: &str, params: Value, timeout: Duration) -> Result<Value> {
        let router = &self.inner.router;
        if router.gone.is_cancelled() {
            return Err(LspError::Crashed);
        }

        let id = self.inner.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        router.pending.lock().insert(id, tx);

        if router
            .outbound
            .send(protocol::request(id, method, params))
            .is_err()
        {
            router.pending.lock().remove(&id);
            return Err(LspError::Crashed);
        }
        tracing::debug!(server = %router.server, id, method, "request");

        let outcome = tokio::select! {
            biased;
            reply = rx => match reply {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(LspError::Response { code: e.code, message: e.message }),
                Err(_) => Err(LspError::Crashed),
            },
            () = router.gone.cancelled() => Err(LspError::Crashed),
            () = tokio::time::sleep(timeout) => Err(LspError::Timeout(method.to_string())),
        };

        if outcome.is_err() {
            router.pending.lock().remove(&id);
        }
        outcome
    }

    /// Subscribe to server notifications until `cancel` fires or the
    /// returned stream is dropped.
    pub fn listen_for_notifications(&self, cancel: CancellationToken) -> NotificationStream {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let router = self.inner.router.clone();
        let registered = !router.gone.is_cancelled();
        if registered {
            router.listeners.lock().push(Listener { id, tx });
        }
        NotificationStream {
            id,
            rx,
            router,
            cancel,
            registered,
        }
    }

    // ============================================================
    // Text document sync
    // ============================================================

    pub fn open_document(
        &self,
        language_id: &str,
        path: &Path,
        text: &str,
        version: i32,
    ) -> Result<()> {
        self.ensure_normal()?;
        let document =
            TextDocumentItem::new(uri_from_path(path)?, language_id.to_string(), version, text.to_string());
        self.notify::<DidOpenTextDocument>(DidOpenTextDocumentParams {
            text_document: document,
        })
    }

    /// Full-text `didChange`. `want_diagnostics` is forwarded as the
    /// `wantDiagnostics` extension field when given.
    pub fn change_document(
        &self,
        path: &Path,
        version: i32,
        text: &str,
        want_diagnostics: Option<bool>,
    ) -> Result<()> {
        self.ensure_normal()?;
        let params = DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier::new(uri_from_path(path)?, version),
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: text.to_string(),
            }],
        };
        let mut params = serde_json::to_value(params)?;
        if let Some(want) = want_diagnostics {
            params["wantDiagnostics"] = Value::Bool(want);
        }
        self.send_notification(DidChangeTextDocument::METHOD, params)
    }

    pub fn save_document(&self, path: &Path) -> Result<()> {
        self.ensure_normal()?;
        self.notify::<DidSaveTextDocument>(DidSaveTextDocumentParams {
            text_document: TextDocumentIdentifier::new(uri_from_path(path)?),
            text: None,
        })
    }

    pub fn close_document(&self, path: &Path) -> Result<()> {
        self.ensure_normal()?;
        self.notify::<DidCloseTextDocument>(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier::new(uri_from_path(path)?),
        })
    }

    // ============================================================
    // Language features
    // ============================================================

    pub async fn request_completion(
        &self,
        path: &Path,
        line: u32,
        character: u32,
    ) -> Result<Vec<CompletionItem>> {
        let params = CompletionParams {
            text_document_position: position_params(path, line, character)?,
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: Some(CompletionContext {
                trigger_kind: CompletionTriggerKind::INVOKED,
                trigger_character: None,
            }),
        };
        Ok(match self.request::<Completion>(params).await? {
            Some(CompletionResponse::Array(items)) => items,
            Some(CompletionResponse::List(list)) => list.items,
            None => Vec::new(),
        })
    }

    /// Signature hint for the call under the cursor: the label of the
    /// active signature.
    pub async fn request_signature(
        &self,
        path: &Path,
        line: u32,
        character: u32,
    ) -> Result<Option<String>> {
        let params = SignatureHelpParams {
            context: None,
            text_document_position_params: position_params(path, line, character)?,
            work_done_progress_params: Default::default(),
        };
        let help = self.request::<SignatureHelpRequest>(params).await?;
        Ok(help.and_then(signature_hint))
    }

    // ============================================================
    // Shutdown
    // ============================================================

    /// Graceful shutdown: `shutdown`/`exit` handshake if the server is
    /// still up, then make sure the process is gone and the pumps are done.
    pub async fn exit(&self) {
        let mut child = self.inner.child.lock().await;
        let previous = self.set_state(ClientState::ShuttingDown);
        if previous == ClientState::Exited {
            self.set_state(ClientState::Exited);
            return;
        }

        let router = &self.inner.router;
        if previous == ClientState::Normal && !router.gone.is_cancelled() {
            match self.call(Shutdown::METHOD, Value::Null, SHUTDOWN_TIMEOUT).await {
                Ok(_) => {
                    if let Err(e) = self.send_notification(Exit::METHOD, Value::Null) {
                        tracing::debug!(server = %router.server, error = %e, "exit notification not sent");
                    }
                }
                Err(e) => {
                    tracing::warn!(server = %router.server, error = %e, "shutdown request failed")
                }
            }
        }

        if let Some(mut process) = child.take() {
            if tokio::time::timeout(EXIT_GRACE, process.wait()).await.is_err() {
                if let Err(e) = process.start_kill() {
                    tracing::warn!(server = %router.server, error = %e, "failed to kill language server");
                }
                if let Err(e) = process.wait().await {
                    tracing::warn!(server = %router.server, error = %e, "failed to reap language server");
                }
            }
        }

        router.close();
        let pumps = std::mem::take(&mut *self.inner.pumps.lock());
        for pump in pumps {
            let abort = pump.abort_handle();
            if tokio::time::timeout(EXIT_GRACE, pump).await.is_err() {
                abort.abort();
            }
        }

        self.set_state(ClientState::Exited);
        tracing::info!(server = %router.server, "language server exited");
    }
}

/// Subscription to a client's notifications.
///
/// Dropping the stream, or cancelling its token, removes it from the
/// client's broadcast list.
pub struct NotificationStream {
    id: u64,
    rx: mpsc::UnboundedReceiver<ServerNotification>,
    router: Arc<Router>,
    cancel: CancellationToken,
    registered: bool,
}

impl NotificationStream {
    /// Next notification. `Ok(None)` once cancelled; `Err(Crashed)` once
    /// the server is gone and everything queued has been delivered.
    pub async fn next(&mut self) -> Result<Option<ServerNotification>> {
        if self.cancel.is_cancelled() {
            self.deregister();
            return Ok(None);
        }
        if !self.registered {
            return Err(LspError::Crashed);
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                self.deregister();
                Ok(None)
            }
            item = self.rx.recv() => match item {
                Some(notification) => Ok(Some(notification)),
                None => {
                    self.deregister();
                    Err(LspError::Crashed)
                }
            },
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    fn deregister(&mut self) {
        if self.registered {
            let id = self.id;
            self.router.listeners.lock().retain(|l| l.id != id);
            self.rx.close();
            self.registered = false;
        }
    }
}

impl Drop for NotificationStream {
    fn drop(&mut self) {
        self.deregister();
    }
}

async fn write_loop<W>(mut writer: W, mut outbound: mpsc::UnboundedReceiver<Value>, router: Arc<Router>)
where
    W: AsyncWrite + Unpin,
{
    loop {
        let msg = tokio::select! {
            biased;
            msg = outbound.recv() => msg,
            () = router.gone.cancelled() => None,
        };
        let Some(msg) = msg else { break };
        if let Err(e) = protocol::write_message(&mut writer, &msg).await {
            tracing::error!(server = %router.server, error = %e, "failed to write to language server");
            break;
        }
    }
    router.close();
}

async fn read_loop<R>(mut reader: R, router: Arc<Router>)
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    loop {
        let read = tokio::select! {
            read = protocol::read_message(&mut reader) => read,
            () = router.gone.cancelled() => break,
        };
        match read {
            Ok(Some(msg)) => router.dispatch(msg),
            Ok(None) => {
                tracing::info!(server = %router.server, "language server closed its output");
                break;
            }
            Err(LspError::Json(e)) => {
                tracing::warn!(server = %router.server, error = %e, "skipping malformed message body");
            }
            Err(e) => {
                tracing::error!(server = %router.server, error = %e, "failed to read from language server");
                break;
            }
        }
    }
    router.close();
}

fn position_params(path: &Path, line: u32, character: u32) -> Result<TextDocumentPositionParams> {
    Ok(TextDocumentPositionParams {
        text_document: TextDocumentIdentifier::new(uri_from_path(path)?),
        position: Position::new(line, character),
    })
}

fn signature_hint(help: SignatureHelp) -> Option<String> {
    let active = help.active_signature.unwrap_or(0) as usize;
    help.signatures
        .into_iter()
        .nth(active)
        .map(|signature| signature.label)
}

fn client_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        text_document: Some(TextDocumentClientCapabilities {
            synchronization: Some(TextDocumentSyncClientCapabilities {
                did_save: Some(true),
                ..Default::default()
            }),
            completion: Some(CompletionClientCapabilities::default()),
            signature_help: Some(SignatureHelpClientCapabilities::default()),
            publish_diagnostics: Some(PublishDiagnosticsClientCapabilities {
                version_support: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }),
        window: Some(WindowClientCapabilities {
            work_done_progress: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}
