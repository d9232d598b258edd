//! Remote MCP tools as local `Tool`s
//!
//! `McpToolBridge::mount` discovers every tool a connected server
//! advertises and registers a bridge for each in a `ToolRegistry`, so
//! remote tools sit next to the built-ins and the agent cannot tell
//! them apart. A call that fails in-band (`isError`) comes back as a
//! `ToolResult::failure`, keeping the observation-not-fault policy.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::client::McpClient;
use super::protocol::McpTool;
use crate::error::Result;
use crate::tools::{Tool, ToolRegistry, ToolResult};

/// One remote tool, callable through the local `Tool` trait.
pub struct McpToolBridge {
    server: Arc<McpClient>,
    tool: McpTool,
}

impl McpToolBridge {
    pub fn new(server: Arc<McpClient>, tool: McpTool) -> Self {
        McpToolBridge { server, tool }
    }

    /// Register a bridge for every tool the server advertises.
    ///
    /// Returns how many tools were mounted.
    pub async fn mount(server: Arc<McpClient>, registry: &mut ToolRegistry) -> Result<usize> {
        let tools = server.list_tools().await?;
        let count = tools.len();
        for tool in tools {
            registry.register(McpToolBridge::new(Arc::clone(&server), tool));
        }
        Ok(count)
    }
}

#[async_trait]
impl Tool for McpToolBridge {
    fn name(&self) -> &str {
        &self.tool.name
    }

    fn description(&self) -> &str {
        &self.tool.description
    }

    fn parameters_schema(&self) -> Value {
        // The wire type already serializes as a JSON Schema object.
        serde_json::to_value(&self.tool.input_schema).unwrap_or_default()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let outcome = match self.server.call_tool(&self.tool.name, args).await {
            Ok(result) => result,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "MCP tool '{}' failed: {}",
                    self.tool.name, e
                )))
            }
        };

        let text: String = outcome
            .content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        let mut result = if outcome.is_error {
            ToolResult::failure(text)
        } else {
            ToolResult::success(text)
        };
        result.metadata = Some(serde_json::json!({ "server": self.server.name() }));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::McpServer;
    use tokio::io::{duplex, BufReader};

    async fn in_process_client() -> Arc<McpClient> {
        let (client_side, server_side) = duplex(4096);
        let (server_read, server_write) = tokio::io::split(server_side);
        tokio::spawn(async move {
            McpServer::new()
                .serve(BufReader::new(server_read), server_write)
                .await
        });
        let (client_read, client_write) = tokio::io::split(client_side);
        Arc::new(
            McpClient::connect_io(client_read, client_write, "in-process")
                .await
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_mount_registers_the_server_tools() {
        let client = in_process_client().await;
        let mut registry = ToolRegistry::new();
        let mounted = McpToolBridge::mount(client, &mut registry).await.unwrap();

        assert_eq!(mounted, 2);
        let calculate = registry.get("calculate").unwrap();
        assert!(!calculate.description().is_empty());
        let schema = calculate.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].get("expression").is_some());
        assert!(registry.get("convert_units").is_some());
    }

    #[tokio::test]
    async fn test_bridged_call_returns_tool_output() {
        let client = in_process_client().await;
        let mut registry = ToolRegistry::new();
        McpToolBridge::mount(client, &mut registry).await.unwrap();

        let tool = registry.get("convert_units").unwrap();
        let result = tool
            .execute(serde_json::json!({
                "value": 0.0,
                "from_unit": "celsius",
                "to_unit": "fahrenheit"
            }))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.content.as_deref(),
            Some("0 celsius = 32.0000 fahrenheit")
        );
        assert_eq!(result.metadata.unwrap()["server"], "in-process");
    }

    #[tokio::test]
    async fn test_in_band_error_becomes_failure_result() {
        let client = in_process_client().await;
        let mut registry = ToolRegistry::new();
        McpToolBridge::mount(client, &mut registry).await.unwrap();

        let tool = registry.get("calculate").unwrap();
        let result = tool
            .execute(serde_json::json!({"expression": "1 / 0"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Error: Division by zero"));
        assert!(result.as_observation().contains("Division by zero"));
    }
}
