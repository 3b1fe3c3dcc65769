//! Test utilities
//! In-memory language server speaking the real wire framing

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::io::{BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lsp::protocol;
use crate::lsp::{ClientOptions, LspClient, LspError, ServerConfig, ServerLauncher};

/// Server end of an in-memory connection, scripted step by step
pub struct FakeServer {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl FakeServer {
    /// A fake server plus the client-side halves to hand to `LspClient::connect`
    pub fn pair() -> (Self, ReadHalf<DuplexStream>, WriteHalf<DuplexStream>) {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (server_read, server_write) = tokio::io::split(server_io);
        (
            FakeServer {
                reader: BufReader::new(server_read),
                writer: server_write,
            },
            client_read,
            client_write,
        )
    }

    /// Next message from the client; `None` once the client hung up
    pub async fn recv(&mut self) -> Option<Value> {
        protocol::read_message(&mut self.reader).await.ok().flatten()
    }

    /// Next message with the given method, skipping everything else
    pub async fn recv_method(&mut self, method: &str) -> Value {
        loop {
            let msg = self.recv().await.expect("client hung up");
            if msg["method"] == method {
                return msg;
            }
        }
    }

    pub async fn send(&mut self, msg: Value) {
        protocol::write_message(&mut self.writer, &msg)
            .await
            .expect("write to client");
    }

    pub async fn respond(&mut self, request: &Value, result: Value) {
        self.send(protocol::response(request["id"].clone(), result))
            .await;
    }

    pub async fn notify(&mut self, method: &str, params: Value) {
        self.send(protocol::notification(method, params)).await;
    }

    /// Answer `initialize` with `capabilities` and wait for `initialized`
    pub async fn handshake(&mut self, capabilities: Value) {
        let init = self.recv_method("initialize").await;
        self.respond(&init, json!({ "capabilities": capabilities }))
            .await;
        self.recv_method("initialized").await;
    }

    /// Keep serving in the background: record every client message,
    /// answer every request with `null`, and forward anything pushed
    /// through the returned handle.
    pub fn serve(self) -> ServerHandle {
        let FakeServer {
            mut reader,
            mut writer,
        } = self;
        let received = Arc::new(Mutex::new(Vec::new()));
        let (push, mut outgoing) = mpsc::unbounded_channel::<Value>();

        let write_task = tokio::spawn(async move {
            while let Some(msg) = outgoing.recv().await {
                if protocol::write_message(&mut writer, &msg).await.is_err() {
                    break;
                }
            }
        });

        let log = received.clone();
        let replies = push.clone();
        let read_task = tokio::spawn(async move {
            while let Ok(Some(msg)) = protocol::read_message(&mut reader).await {
                let is_request = msg.get("id").is_some() && msg.get("method").is_some();
                log.lock().push(msg.clone());
                if is_request {
                    let _ = replies.send(protocol::response(msg["id"].clone(), Value::Null));
                }
            }
        });

        ServerHandle {
            received,
            push,
            tasks: vec![read_task, write_task],
        }
    }
}

/// Background fake server started by [`FakeServer::serve`]
pub struct ServerHandle {
    received: Arc<Mutex<Vec<Value>>>,
    push: mpsc::UnboundedSender<Value>,
    tasks: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    /// Every message the client sent so far
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }

    /// Messages with the given method
    pub fn received_method(&self, method: &str) -> Vec<Value> {
        self.received
            .lock()
            .iter()
            .filter(|m| m["method"] == method)
            .cloned()
            .collect()
    }

    /// Push a notification to the client
    pub fn notify(&self, method: &str, params: Value) {
        let _ = self.push.send(protocol::notification(method, params));
    }

    /// Drop the connection as if the server process died
    pub fn crash(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Connected client plus its scripted server, handshake already done
pub async fn connect_fake(capabilities: Value) -> (LspClient, FakeServer) {
    let (mut server, reader, writer) = FakeServer::pair();
    let (client, ()) = tokio::join!(
        LspClient::connect(
            "fake",
            Path::new("/tmp"),
            reader,
            writer,
            ClientOptions::default()
        ),
        server.handshake(capabilities)
    );
    (client.expect("handshake"), server)
}

/// Connected client whose server runs in the background
pub async fn connect_serving(capabilities: Value) -> (LspClient, ServerHandle) {
    let (client, server) = connect_fake(capabilities).await;
    (client, server.serve())
}

/// Launcher for a [`crate::lsp::LanguageClientManager`] that starts
/// background fake servers instead of processes
#[derive(Default)]
pub struct FakeLauncher {
    fail: AtomicBool,
    servers: Mutex<Vec<ServerHandle>>,
}

impl FakeLauncher {
    pub fn failing() -> Self {
        let launcher = Self::default();
        launcher.set_failing(true);
        launcher
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Servers started so far
    pub fn launches(&self) -> usize {
        self.servers.lock().len()
    }

    /// Push a notification from every server
    pub fn notify(&self, method: &str, params: Value) {
        for server in self.servers.lock().iter() {
            server.notify(method, params.clone());
        }
    }

    /// Messages with `method` received by any server
    pub fn received_method(&self, method: &str) -> Vec<Value> {
        self.servers
            .lock()
            .iter()
            .flat_map(|server| server.received_method(method))
            .collect()
    }

    /// Kill every server
    pub fn crash_all(&self) {
        for server in self.servers.lock().iter() {
            server.crash();
        }
    }
}

#[async_trait]
impl ServerLauncher for FakeLauncher {
    async fn launch(
        &self,
        config: &ServerConfig,
        root: &Path,
        options: ClientOptions,
    ) -> crate::lsp::Result<LspClient> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LspError::StartupFailed {
                server: config.command.clone(),
                reason: "initialize timed out".into(),
            });
        }
        let (mut server, reader, writer) = FakeServer::pair();
        let (client, ()) = tokio::join!(
            LspClient::connect(&config.command, root, reader, writer, options),
            server.handshake(json!({}))
        );
        let client = client?;
        self.servers.lock().push(server.serve());
        Ok(client)
    }
}

/// Give spawned tasks a chance to run on a current-thread runtime
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
