//! Unit converter tool (free-text variant)
//!
//! Accepts the `"<value> <from_unit> to <to_unit>"` form and parses it into
//! a typed [`ConversionRequest`](crate::units::ConversionRequest) before
//! doing any work.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::error::Result;
use crate::units::ConversionRequest;

#[derive(Debug, Deserialize)]
struct ConverterArgs {
    input: String,
}

/// Built-in tool: unit conversion
#[derive(Default)]
pub struct UnitConverterTool;

impl UnitConverterTool {
    pub fn new() -> Self {
        UnitConverterTool
    }
}

#[async_trait]
impl Tool for UnitConverterTool {
    fn name(&self) -> &str {
        "unit_converter"
    }

    fn description(&self) -> &str {
        "Convert between units of length, weight, and temperature. \
         Input format: '<value> <from_unit> to <to_unit>' (e.g. '100 meters to feet')."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "Conversion request, e.g. '100 meters to feet'"
                }
            },
            "required": ["input"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: ConverterArgs = serde_json::from_value(args)
            .map_err(|e| crate::Error::InvalidInput(format!("Invalid converter arguments: {}", e)))?;

        let request: ConversionRequest = match args.input.parse() {
            Ok(request) => request,
            Err(e) => return Ok(ToolResult::failure(format!("{}", e))),
        };

        match request.format() {
            Ok(line) => Ok(ToolResult::success(line)),
            Err(e) => Ok(ToolResult::failure(format!("{}", e))),
        }
    }
}
