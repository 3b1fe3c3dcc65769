//! JSON-RPC framing for the language server wire
//!
//! Messages are `Content-Length` framed JSON bodies. Inbound messages are
//! classified by the presence of `id` and `method`.

use lsp_types::request::{
    RegisterCapability, Request, ShowMessageRequest, UnregisterCapability,
    WorkDoneProgressCreate, WorkspaceConfiguration,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{LspError, Result};
use crate::constants::lsp::{MAX_MESSAGE_BYTES, METHOD_NOT_FOUND};

/// Error object carried by a failed response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// An inbound message after classification
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Answer to one of our requests
    Response {
        id: u64,
        result: std::result::Result<Value, ResponseError>,
    },
    /// Server-to-client notification
    Notification { method: String, params: Value },
    /// Server-to-client request that expects a reply
    Request {
        id: Value,
        method: String,
        params: Value,
    },
}

pub fn request(id: u64, method: &str, params: Value) -> Value {
    let mut msg = json!({ "jsonrpc": "2.0", "id": id, "method": method });
    if !params.is_null() {
        msg["params"] = params;
    }
    msg
}

pub fn notification(method: &str, params: Value) -> Value {
    let mut msg = json!({ "jsonrpc": "2.0", "method": method });
    if !params.is_null() {
        msg["params"] = params;
    }
    msg
}

pub fn response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}

/// Writes one framed message and flushes.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, msg: &Value) -> Result<()> {
    let body = serde_json::to_string(msg)?;
    let framed = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one framed message. `Ok(None)` means the stream ended cleanly
/// between messages.
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Option<Value>> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            if content_length.is_none() {
                return Ok(None);
            }
            return Err(LspError::Protocol("stream ended inside a header".into()));
        }

        let header = line.trim_end();
        if header.is_empty() {
            if content_length.is_some() {
                break;
            }
            continue;
        }

        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                let len = value.trim().parse::<usize>().map_err(|_| {
                    LspError::Protocol(format!("bad Content-Length: {}", value.trim()))
                })?;
                if len > MAX_MESSAGE_BYTES {
                    return Err(LspError::Protocol(format!(
                        "Content-Length {len} exceeds the {MAX_MESSAGE_BYTES} byte limit"
                    )));
                }
                content_length = Some(len);
            }
        }
    }

    let len = content_length.unwrap_or_default();
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(serde_json::from_slice(&body)?))
}

/// Sorts a raw message into response, notification or request.
pub fn classify(mut msg: Value) -> Result<Message> {
    let params = msg.get_mut("params").map(Value::take).unwrap_or(Value::Null);
    let method = msg
        .get("method")
        .and_then(Value::as_str)
        .map(str::to_string);
    let id = msg.get_mut("id").map(Value::take).filter(|id| !id.is_null());

    match (id, method) {
        (Some(id), Some(method)) => Ok(Message::Request { id, method, params }),
        (None, Some(method)) => Ok(Message::Notification { method, params }),
        (Some(id), None) => {
            let id = id
                .as_u64()
                .ok_or_else(|| LspError::Protocol(format!("unexpected response id {id}")))?;
            let result = match msg.get_mut("error").map(Value::take) {
                Some(error) if !error.is_null() => {
                    Err(serde_json::from_value::<ResponseError>(error)?)
                }
                _ => Ok(msg.get_mut("result").map(Value::take).unwrap_or(Value::Null)),
            };
            Ok(Message::Response { id, result })
        }
        (None, None) => Err(LspError::Protocol(
            "message has neither id nor method".into(),
        )),
    }
}

/// Reply for a server-initiated request the editor has no handler for.
///
/// A handful of housekeeping requests get an empty success so the server
/// never blocks on us; anything else gets `MethodNotFound`.
pub fn default_reply(id: Value, method: &str, params: &Value) -> Value {
    if method == ShowMessageRequest::METHOD
        || method == WorkDoneProgressCreate::METHOD
        || method == RegisterCapability::METHOD
        || method == UnregisterCapability::METHOD
    {
        return response(id, Value::Null);
    }

    if method == WorkspaceConfiguration::METHOD {
        let count = params
            .get("items")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        return response(id, Value::Array(vec![Value::Null; count]));
    }

    error_response(id, METHOD_NOT_FOUND, &format!("unhandled method {method}"))
}
