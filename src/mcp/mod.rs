//! MCP (Model Context Protocol) module
//!
//! Both halves of the protocol live here: a stdio server exposing the
//! calculator and unit-conversion tools to any MCP-compatible client, and
//! a stdio client for consuming external MCP servers (including our own).
//!
//! ## Architecture
//!
//! - **protocol**: Wire protocol types (JSON-RPC 2.0 based)
//! - **server**: Newline-delimited stdio server (`reagent-mcp` binary)
//! - **client**: Client over any line-framed transport; `connect_stdio`
//!   spawns a server subprocess, `connect_io` takes an existing pair of
//!   streams
//! - **bridge**: Mounts a server's tools into a `ToolRegistry` through
//!   Reagent's `Tool` trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reagent::mcp::McpClient;
//!
//! # async fn example() -> reagent::Result<()> {
//! // Connect to a local MCP server
//! let client = McpClient::connect_stdio("reagent-mcp").await?;
//!
//! // List available tools
//! let tools = client.list_tools().await?;
//!
//! // Call a tool
//! let line = client
//!     .call_tool_text("calculate", serde_json::json!({"expression": "2 + 2"}))
//!     .await?;
//!
//! // Close the connection and reap the server process
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod bridge;
mod client;
mod protocol;
mod server;

pub use bridge::McpToolBridge;
pub use client::McpClient;
pub use protocol::{
    McpContent, McpError, McpRequest, McpResponse, McpTool, McpToolInput, McpToolResult,
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND,
};
pub use server::McpServer;
