//! Restricted script tool
//!
//! Executes small calculator scripts: one statement per line, where a
//! statement is either an assignment `name = <expression>` or a bare
//! expression. Expressions go through the parsed evaluator in
//! `crate::calc`, so the script language cannot reach the host at all -
//! no imports, no I/O, no control flow.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::calc;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct ScriptArgs {
    code: String,
}

/// Built-in tool: restricted calculator scripts
#[derive(Default)]
pub struct ScriptTool;

impl ScriptTool {
    pub fn new() -> Self {
        ScriptTool
    }

    /// Run a script, returning one output line per evaluated statement.
    fn run(code: &str) -> std::result::Result<String, String> {
        let mut env: HashMap<String, f64> = HashMap::new();
        let mut output = Vec::new();

        for (index, line) in code.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let lineno = index + 1;
            match split_assignment(line) {
                Some((name, expr)) => {
                    let value = calc::evaluate_with_env(expr, &env)
                        .map_err(|e| format!("line {}: {}", lineno, e))?;
                    env.insert(name.to_string(), value);
                    output.push(format!("{} = {}", name, calc::format_value(value)));
                }
                None => {
                    let value = calc::evaluate_with_env(line, &env)
                        .map_err(|e| format!("line {}: {}", lineno, e))?;
                    output.push(calc::format_value(value));
                }
            }
        }

        if output.is_empty() {
            Ok("Script executed (no output)".to_string())
        } else {
            Ok(output.join("\n"))
        }
    }
}

/// Split `name = expr` if the line is an assignment to a plain identifier.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (lhs, rhs) = line.split_once('=')?;
    let name = lhs.trim();
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
    {
        Some((name, rhs.trim()))
    } else {
        None
    }
}

#[async_trait]
impl Tool for ScriptTool {
    fn name(&self) -> &str {
        "script"
    }

    fn description(&self) -> &str {
        "Run a small calculator script: one statement per line, either \
         'name = <expression>' or a bare expression. Later lines can use \
         earlier variables. Only arithmetic and the calculator's functions \
         are available."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Script to run, one statement per line"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: ScriptArgs = serde_json::from_value(args)
            .map_err(|e| crate::Error::InvalidInput(format!("Invalid script arguments: {}", e)))?;

        Ok(match Self::run(&args.code) {
            Ok(output) => ToolResult::success(format!("Script result:\n{}", output)),
            Err(e) => ToolResult::failure(format!("Script error: {}", e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_variables_carry_forward() {
        let tool = ScriptTool::new();
        let result = tool
            .execute(serde_json::json!({
                "code": "x = 3\ny = 4\nsqrt(x*x + y*y)"
            }))
            .await
            .unwrap();
        assert!(result.success);
        let content = result.content.unwrap();
        assert!(content.contains("x = 3"));
        assert!(content.ends_with("5"), "{}", content);
    }

    #[tokio::test]
    async fn test_comments_and_blank_lines_skipped() {
        let tool = ScriptTool::new();
        let result = tool
            .execute(serde_json::json!({
                "code": "# area of a circle\n\nr = 2\npi * r ** 2"
            }))
            .await
            .unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_error_reports_line_number() {
        let tool = ScriptTool::new();
        let result = tool
            .execute(serde_json::json!({"code": "a = 1\nb = a / 0"}))
            .await
            .unwrap();
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("line 2"), "{}", error);
        assert!(error.contains("division by zero"), "{}", error);
    }

    #[tokio::test]
    async fn test_host_access_is_impossible() {
        let tool = ScriptTool::new();
        for code in ["import os", "open('/etc/passwd')", "__builtins__"] {
            let result = tool
                .execute(serde_json::json!({"code": code}))
                .await
                .unwrap();
            assert!(!result.success, "{} should fail", code);
        }
    }

    #[tokio::test]
    async fn test_empty_script() {
        let tool = ScriptTool::new();
        let result = tool
            .execute(serde_json::json!({"code": "   \n# nothing\n"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.content.unwrap().contains("no output"));
    }
}
