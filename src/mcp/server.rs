//! MCP stdio server
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout, exposing the
//! `calculate` and `convert_units` tools. The loop has a single state:
//! read a line, dispatch, answer, repeat until stdin closes. Malformed
//! JSON lines are logged and skipped without a response; logging goes to
//! stderr so stdout stays protocol-clean.

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::protocol::{
    McpRequest, McpResponse, McpTool, McpToolInput, McpToolResult, INTERNAL_ERROR,
    INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::error::Result;
use crate::units::PRECISION;
use crate::{calc, units};

/// Stateless MCP server over stdio
pub struct McpServer {
    name: String,
    version: String,
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl McpServer {
    pub fn new() -> Self {
        McpServer {
            name: "reagent-calculator".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serve requests from stdin until it closes.
    pub async fn run(&self) -> Result<()> {
        info!("Starting MCP calculator server v{}", self.version);
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// The actual loop, generic over the transport for testability.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: tokio::io::AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: McpRequest = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    // No response for an unparseable line; the requester
                    // observes a timeout rather than an explicit error.
                    warn!("Skipping invalid JSON line: {}", e);
                    continue;
                }
            };

            debug!("Received request: {}", request.method);
            let response = self.handle_request(request);

            let json = serde_json::to_string(&response)?;
            writer.write_all(json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Dispatch one request to its handler.
    pub fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = request.id.clone();
        let params = request.params.unwrap_or_else(|| Value::Object(Default::default()));

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "tools/list" => Ok(self.handle_list_tools()),
            "tools/call" => self.handle_call_tool(params),
            other => {
                return McpResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", other),
                )
            }
        };

        match result {
            Ok(value) => McpResponse::success(id, value),
            Err(CallError::UnknownTool(name)) => {
                McpResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {}", name))
            }
            Err(CallError::Internal(message)) => {
                McpResponse::error(id, INTERNAL_ERROR, message)
            }
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name,
                "version": self.version
            }
        })
    }

    fn handle_list_tools(&self) -> Value {
        let tools = vec![
            McpTool {
                name: "calculate".to_string(),
                description: "Perform mathematical calculations. Supports basic arithmetic \
                              (+, -, *, /, %, **), trigonometry (sin, cos, tan), and other \
                              math functions (sqrt, log, log10, exp, abs, round, min, max, \
                              sum, pow)."
                    .to_string(),
                input_schema: McpToolInput {
                    schema_type: "object".to_string(),
                    properties: serde_json::json!({
                        "expression": {
                            "type": "string",
                            "description": "Mathematical expression to evaluate (e.g., '2 + 3 * 4', 'sqrt(16)', 'sin(pi/2)')"
                        }
                    }),
                    required: vec!["expression".to_string()],
                },
            },
            McpTool {
                name: "convert_units".to_string(),
                description: "Convert between different units (length, weight, temperature)"
                    .to_string(),
                input_schema: McpToolInput {
                    schema_type: "object".to_string(),
                    properties: serde_json::json!({
                        "value": {
                            "type": "number",
                            "description": "The value to convert"
                        },
                        "from_unit": {
                            "type": "string",
                            "description": "The unit to convert from (e.g., 'meters', 'feet', 'celsius', 'kg')"
                        },
                        "to_unit": {
                            "type": "string",
                            "description": "The unit to convert to"
                        }
                    }),
                    required: vec![
                        "value".to_string(),
                        "from_unit".to_string(),
                        "to_unit".to_string(),
                    ],
                },
            },
        ];
        serde_json::json!({ "tools": tools })
    }

    fn handle_call_tool(&self, params: Value) -> std::result::Result<Value, CallError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        let result = match name.as_str() {
            "calculate" => calculate(arguments)?,
            "convert_units" => convert_units(arguments)?,
            _ => return Err(CallError::UnknownTool(name)),
        };

        serde_json::to_value(result).map_err(|e| CallError::Internal(e.to_string()))
    }
}

/// Failures from tools/call that map onto JSON-RPC error codes
enum CallError {
    UnknownTool(String),
    Internal(String),
}

#[derive(Deserialize)]
struct CalculateArgs {
    #[serde(default)]
    expression: String,
}

fn calculate(arguments: Value) -> std::result::Result<McpToolResult, CallError> {
    let args: CalculateArgs =
        serde_json::from_value(arguments).map_err(|e| CallError::Internal(e.to_string()))?;

    Ok(match calc::evaluate(&args.expression) {
        Ok(value) => McpToolResult::text(calc::format_result(&args.expression, value)),
        Err(calc::CalcError::DivisionByZero) => {
            McpToolResult::error_text("Error: Division by zero")
        }
        Err(e) => McpToolResult::error_text(format!("Error: {}", e)),
    })
}

#[derive(Deserialize)]
struct ConvertArgs {
    #[serde(default)]
    value: f64,
    #[serde(default)]
    from_unit: String,
    #[serde(default)]
    to_unit: String,
}

fn convert_units(arguments: Value) -> std::result::Result<McpToolResult, CallError> {
    let args: ConvertArgs =
        serde_json::from_value(arguments).map_err(|e| CallError::Internal(e.to_string()))?;

    Ok(match units::convert(args.value, &args.from_unit, &args.to_unit) {
        Ok(result) => McpToolResult::text(format!(
            "{} {} = {:.prec$} {}",
            args.value,
            args.from_unit.to_lowercase(),
            result,
            args.to_unit.to_lowercase(),
            prec = PRECISION
        )),
        Err(e) => McpToolResult::error_text(format!("Error: {}", e)),
    })
}
