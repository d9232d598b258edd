//! Calculator tool
//!
//! Evaluates mathematical expressions through the parsed evaluator in
//! `crate::calc`. Every evaluation failure (including division by zero)
//! comes back as a failure observation, never as a raised error.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::calc::{self, CalcError};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct CalculatorArgs {
    expression: String,
}

/// Built-in tool: safe expression evaluation
#[derive(Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    pub fn new() -> Self {
        CalculatorTool
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform mathematical calculations. Supports + - * / % **, parentheses, \
         functions (sqrt, sin, cos, tan, log, log10, exp, abs, round, min, max, sum, pow) \
         and the constants pi and e."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Mathematical expression to evaluate (e.g. '2 + 3 * 4', 'sqrt(16)', 'sin(pi/2)')"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: CalculatorArgs = serde_json::from_value(args)
            .map_err(|e| crate::Error::InvalidInput(format!("Invalid calculator arguments: {}", e)))?;

        match calc::evaluate(&args.expression) {
            Ok(value) => Ok(ToolResult::success(calc::format_result(
                &args.expression,
                value,
            ))),
            Err(CalcError::DivisionByZero) => {
                Ok(ToolResult::failure("Division by zero"))
            }
            Err(e) => Ok(ToolResult::failure(format!("Calculation error: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_arithmetic() {
        let tool = CalculatorTool::new();
        let result = tool
            .execute(serde_json::json!({"expression": "2 + 3 * 4"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content.as_deref(), Some("2 + 3 * 4 = 14"));
    }

    #[tokio::test]
    async fn test_division_by_zero_reported_distinctly() {
        let tool = CalculatorTool::new();
        let result = tool
            .execute(serde_json::json!({"expression": "1 / 0"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Division by zero"));
    }

    #[tokio::test]
    async fn test_hostile_input_is_an_error_string() {
        let tool = CalculatorTool::new();
        for expr in ["__import__('os')", "exec", "open('x')", "eval(1)", "compile"] {
            let result = tool
                .execute(serde_json::json!({"expression": expr}))
                .await
                .unwrap();
            assert!(!result.success, "{} should fail", expr);
        }
    }
}
