//! MCP client side of the newline-delimited JSON-RPC framing
//!
//! A client is a pair of byte streams carrying one JSON message per line,
//! the same framing `McpServer::serve` speaks on the other end.
//! `connect_stdio` spawns a server subprocess over that framing; tests
//! connect a client straight to an in-process server over
//! `tokio::io::duplex`.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::protocol::{McpRequest, McpResponse, McpTool, McpToolResult};
use crate::error::{Error, Result};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Client for one MCP server connection.
///
/// Requests are serialized: each call writes a line, then blocks on the
/// next response line. Ids are assigned from a local counter.
pub struct McpClient {
    reader: Mutex<BufReader<BoxedReader>>,
    writer: Mutex<BoxedWriter>,
    /// Subprocess handle when the transport is stdio. `kill_on_drop` is
    /// set, so an abandoned client does not leak the server process.
    child: Option<Child>,
    next_id: AtomicU64,
    name: String,
}

impl McpClient {
    /// Spawn `command` as an MCP server subprocess and connect to it.
    pub async fn connect_stdio(command: &str) -> Result<Self> {
        Self::connect_stdio_with_args(command, &[]).await
    }

    /// Spawn an MCP server subprocess with arguments and connect to it.
    ///
    /// The server's stderr is inherited so its logs stay visible; only
    /// stdin/stdout carry protocol traffic.
    pub async fn connect_stdio_with_args(command: &str, args: &[&str]) -> Result<Self> {
        debug!("Spawning MCP server: {} {:?}", command, args);

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Connection(format!("Failed to spawn MCP server '{}': {}", command, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Connection("Failed to capture MCP server stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Connection("Failed to capture MCP server stdout".to_string()))?;

        let client = Self::from_parts(
            Box::new(stdout),
            Box::new(stdin),
            Some(child),
            command.to_string(),
        );
        client.initialize().await?;
        Ok(client)
    }

    /// Connect over an arbitrary transport already speaking the framing.
    ///
    /// `reader` carries the server's responses, `writer` our requests.
    pub async fn connect_io<R, W>(reader: R, writer: W, name: impl Into<String>) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let client = Self::from_parts(Box::new(reader), Box::new(writer), None, name.into());
        client.initialize().await?;
        Ok(client)
    }

    fn from_parts(
        reader: BoxedReader,
        writer: BoxedWriter,
        child: Option<Child>,
        name: String,
    ) -> Self {
        McpClient {
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(writer),
            child,
            next_id: AtomicU64::new(1),
            name,
        }
    }

    /// Write one request line and read the matching response line.
    async fn exchange(&self, request: McpRequest) -> Result<McpResponse> {
        let json = serde_json::to_string(&request)?;
        debug!("MCP request -> {}: {}", self.name, json);

        {
            let mut writer = self.writer.lock().await;
            writer
                .write_all(json.as_bytes())
                .await
                .map_err(|e| Error::Connection(format!("Failed to write to MCP server: {}", e)))?;
            writer.write_all(b"\n").await.map_err(|e| {
                Error::Connection(format!("Failed to write newline to MCP server: {}", e))
            })?;
            writer
                .flush()
                .await
                .map_err(|e| Error::Connection(format!("Failed to flush MCP transport: {}", e)))?;
        }

        let mut line = String::new();
        {
            let mut reader = self.reader.lock().await;
            let read = reader
                .read_line(&mut line)
                .await
                .map_err(|e| Error::Connection(format!("Failed to read from MCP server: {}", e)))?;
            if read == 0 {
                return Err(Error::Connection(format!(
                    "MCP server {} closed the connection",
                    self.name
                )));
            }
        }

        debug!("MCP response <- {}: {}", self.name, line.trim());

        let response: McpResponse = serde_json::from_str(line.trim()).map_err(|e| {
            Error::InvalidInput(format!(
                "Failed to parse MCP response: {} (raw: {})",
                e,
                line.trim()
            ))
        })?;

        if let Some(ref err) = response.error {
            return Err(Error::Provider(format!(
                "MCP error from {}: {} (code {})",
                self.name, err.message, err.code
            )));
        }

        Ok(response)
    }

    fn take_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Perform the initialize handshake.
    async fn initialize(&self) -> Result<()> {
        let response = self.exchange(McpRequest::initialize(self.take_id())).await?;
        if let Some(result) = response.result {
            debug!("MCP server {} initialized: {:?}", self.name, result);
        }
        Ok(())
    }

    /// List the tools the server advertises.
    pub async fn list_tools(&self) -> Result<Vec<McpTool>> {
        let response = self.exchange(McpRequest::list_tools(self.take_id())).await?;

        let result = response.result.unwrap_or_default();
        let tools: Vec<McpTool> = result
            .get("tools")
            .and_then(|t| serde_json::from_value(t.clone()).ok())
            .unwrap_or_default();

        debug!("MCP server {} has {} tools", self.name, tools.len());
        Ok(tools)
    }

    /// Call a tool, returning the full result with its `isError` flag.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult> {
        let response = self
            .exchange(McpRequest::call_tool(self.take_id(), name, arguments))
            .await?;

        let result = response.result.unwrap_or_default();
        let tool_result: McpToolResult = serde_json::from_value(result)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse MCP tool result: {}", e)))?;

        if tool_result.is_error {
            warn!("MCP tool {} returned error", name);
        }

        Ok(tool_result)
    }

    /// Call a tool and join its text content blocks into one string.
    pub async fn call_tool_text(&self, name: &str, arguments: Value) -> Result<String> {
        let result = self.call_tool(name, arguments).await?;
        Ok(result
            .content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Server name (the spawned command, or the label given to `connect_io`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the connection and reap the server.
    ///
    /// Dropping the writer closes the server's stdin; `McpServer` exits
    /// its serve loop on that EOF and the subprocess is then waited on.
    /// A server that ignores the EOF is still killed by the drop handle.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.writer);
        drop(self.reader);
        if let Some(mut child) = self.child {
            child
                .wait()
                .await
                .map_err(|e| Error::Connection(format!("MCP server did not exit: {}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::McpServer;
    use tokio::io::duplex;
    use tokio::task::JoinHandle;

    /// Run an `McpServer` on one end of an in-memory pipe and return a
    /// connected client for the other end.
    async fn in_process_pair() -> (McpClient, JoinHandle<Result<()>>) {
        let (client_side, server_side) = duplex(4096);
        let (server_read, server_write) = tokio::io::split(server_side);
        let server_task = tokio::spawn(async move {
            McpServer::new()
                .serve(BufReader::new(server_read), server_write)
                .await
        });
        let (client_read, client_write) = tokio::io::split(client_side);
        let client = McpClient::connect_io(client_read, client_write, "in-process")
            .await
            .unwrap();
        (client, server_task)
    }

    #[tokio::test]
    async fn test_initialize_handshake_succeeds() {
        let (client, _server) = in_process_pair().await;
        assert_eq!(client.name(), "in-process");
    }

    #[tokio::test]
    async fn test_list_tools_reports_calculate_and_convert() {
        let (client, _server) = in_process_pair().await;
        let tools = client.list_tools().await.unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"calculate"), "{:?}", names);
        assert!(names.contains(&"convert_units"), "{:?}", names);
        for tool in &tools {
            assert!(!tool.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_call_tool_text_evaluates_expression() {
        let (client, _server) = in_process_pair().await;
        let text = client
            .call_tool_text("calculate", serde_json::json!({"expression": "2 + 3 * 4"}))
            .await
            .unwrap();
        assert_eq!(text, "2 + 3 * 4 = 14");
    }

    #[tokio::test]
    async fn test_tool_failure_arrives_in_band() {
        let (client, _server) = in_process_pair().await;
        let result = client
            .call_tool("calculate", serde_json::json!({"expression": "1 / 0"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.content[0].text.as_deref(),
            Some("Error: Division by zero")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_protocol_error() {
        let (client, _server) = in_process_pair().await;
        let err = client
            .call_tool("no_such_tool", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("-32602"), "{}", err);
    }

    #[tokio::test]
    async fn test_shutdown_ends_the_server_loop() {
        let (client, server_task) = in_process_pair().await;
        client.shutdown().await.unwrap();
        // Closing our end is the server's EOF; its loop returns cleanly.
        assert!(server_task.await.unwrap().is_ok());
    }
}
