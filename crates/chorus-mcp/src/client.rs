//! MCP client over a child process's stdin/stdout

use serde_json::{Value, json};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use crate::PROTOCOL_VERSION;
use crate::protocol::{CallToolResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult, McpTool};

/// Errors from the MCP client. Failures are wrapped and returned to the
/// caller rather than swallowed.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("failed to spawn MCP server `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("MCP transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("MCP server closed the stream")]
    ClosedStream,

    #[error("MCP server returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed MCP message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug)]
struct ClientInner {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    // Held so the server process lives as long as the client.
    _child: Child,
    next_id: u64,
}

/// Client for one MCP server process.
///
/// Requests are serialized through a mutex: one in-flight request at a
/// time, responses matched by id.
#[derive(Debug)]
pub struct McpClient {
    inner: Mutex<ClientInner>,
}

impl McpClient {
    /// Spawn the server process and run the initialize handshake.
    pub async fn connect(command: &str, args: &[String]) -> Result<Self, McpError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| McpError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(McpError::ClosedStream)?;
        let stdout = child.stdout.take().ok_or(McpError::ClosedStream)?;
        let lines = BufReader::new(stdout).lines();

        let client = Self {
            inner: Mutex::new(ClientInner {
                stdin,
                lines,
                _child: child,
                next_id: 0,
            }),
        };

        client
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "chorus",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                })),
            )
            .await?;
        client
            .notify("notifications/initialized", None)
            .await?;

        Ok(client)
    }

    /// List the tools the server advertises.
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let result = self.request("tools/list", None).await?;
        let parsed: ListToolsResult = serde_json::from_value(result)?;
        Ok(parsed.tools)
    }

    /// Call a tool by name with the given arguments.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        let result = self
            .request(
                "tools/call",
                Some(json!({
                    "name": name,
                    "arguments": arguments,
                })),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Send a request and wait for the response with the matching id.
    /// Server notifications and unrelated messages are skipped.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let mut inner = self.inner.lock().await;

        inner.next_id += 1;
        let id = inner.next_id;
        let req = JsonRpcRequest::new(id, method, params);
        write_message(&mut inner.stdin, &req).await?;

        loop {
            let line = match inner.lines.next_line().await? {
                Some(line) => line,
                None => return Err(McpError::ClosedStream),
            };
            if line.trim().is_empty() {
                continue;
            }

            let value: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(_) => {
                    debug!("Skipping non-JSON MCP output: {}", line);
                    continue;
                }
            };
            // Server-initiated requests and notifications carry a method
            if value.get("method").is_some() {
                debug!("Skipping server message: {}", line);
                continue;
            }

            let resp: JsonRpcResponse = serde_json::from_value(value)?;
            if resp.id != Some(id) {
                debug!("Skipping response for unexpected id: {:?}", resp.id);
                continue;
            }
            if let Some(err) = resp.error {
                return Err(McpError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            return Ok(resp.result.unwrap_or(Value::Null));
        }
    }

    /// Send a notification (no response expected).
    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), McpError> {
        let mut inner = self.inner.lock().await;
        let req = JsonRpcRequest::notification(method, params);
        write_message(&mut inner.stdin, &req).await
    }
}

async fn write_message(stdin: &mut ChildStdin, req: &JsonRpcRequest) -> Result<(), McpError> {
    let mut payload = serde_json::to_vec(req)?;
    payload.push(b'\n');
    stdin.write_all(&payload).await?;
    stdin.flush().await?;
    Ok(())
}
