//! Adapts our tools to rig-core's `Tool` trait so the provider's native
//! function calling can drive them.

use std::sync::Arc;

use rig::completion::ToolDefinition;
use rig::tool::{Tool as RigTool, ToolError};
use serde::Deserialize;

use crate::tools::Tool;

/// Arguments for tool calls (generic JSON)
#[derive(Deserialize)]
pub struct ToolArgs {
    #[serde(flatten)]
    pub args: serde_json::Value,
}

/// Adapter that wraps one of our tools and implements rig's Tool trait
pub struct RigToolAdapter {
    tool: Arc<dyn Tool>,
}

impl RigToolAdapter {
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        Self { tool }
    }
}

impl RigTool for RigToolAdapter {
    const NAME: &'static str = "reagent_tool_adapter";

    type Error = ToolError;
    type Args = ToolArgs;
    type Output = serde_json::Value;

    fn name(&self) -> String {
        self.tool.name().to_string()
    }

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        let def = self.tool.to_definition();
        ToolDefinition {
            name: def.function.name,
            description: def.function.description,
            parameters: def.function.parameters,
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let result = self
            .tool
            .execute(args.args)
            .await
            .map_err(|e| ToolError::ToolCallError(Box::new(e)))?;

        // Tool failures come back as Ok results with success=false; surface
        // them to the model as observations rather than aborting the turn.
        Ok(serde_json::Value::String(result.as_observation()))
    }
}
