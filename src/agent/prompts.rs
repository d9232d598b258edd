//! Prompt templates for the research agent

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tools::ToolRegistry;

/// A prompt template using Handlebars syntax
pub struct PromptTemplate {
    /// Template name
    name: String,
    /// Handlebars registry
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(name: impl Into<String>, template: &str) -> Result<Self> {
        let name = name.into();
        let mut registry = Handlebars::new();

        registry
            .register_template_string(&name, template)
            .map_err(|e| Error::Internal(format!("Invalid template: {}", e)))?;

        Ok(PromptTemplate { name, registry })
    }

    /// Render the template with given data
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.registry
            .render(&self.name, data)
            .map_err(|e| Error::Internal(format!("Template render error: {}", e)))
    }
}

/// System prompt for the research agent. The tool-call loop itself is
/// handled by the provider's native function calling; the preamble only
/// sets the working style and advertises what is available.
const RESEARCH_PREAMBLE: &str = r#"You are a research assistant that solves problems step by step.

For each question, reason about what information you need, call the
relevant tools to gather it, observe the results, and repeat until you
can give a grounded final answer. Prefer tool output over recall for
anything factual, numeric, or file-related.

## Available Tools
{{#each tools}}
- {{name}}: {{description}}
{{/each}}

## Guidelines
1. Break multi-part questions into separate tool calls
2. Use the calculator for any arithmetic rather than computing in your head
3. Stay inside the workspace for file operations
4. If a tool fails, report the error instead of inventing a result
"#;

#[derive(Serialize)]
struct ToolEntry {
    name: String,
    description: String,
}

#[derive(Serialize)]
struct PreambleData {
    tools: Vec<ToolEntry>,
}

/// Render the agent preamble from the registered tools
pub fn research_preamble(registry: &ToolRegistry) -> Result<String> {
    let mut tools: Vec<ToolEntry> = registry
        .definitions()
        .into_iter()
        .map(|def| ToolEntry {
            name: def.function.name,
            description: def.function.description,
        })
        .collect();
    tools.sort_by(|a, b| a.name.cmp(&b.name));

    let template = PromptTemplate::new("research_preamble", RESEARCH_PREAMBLE)?;
    template.render(&PreambleData { tools })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{CalculatorTool, UnitConverterTool};
    use serde_json::json;

    #[test]
    fn test_prompt_template() {
        let template = PromptTemplate::new("test", "Hello, {{name}}!").unwrap();
        let result = template.render(&json!({"name": "World"})).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(PromptTemplate::new("bad", "{{#each}").is_err());
    }

    #[test]
    fn test_preamble_lists_registered_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(CalculatorTool::new());
        registry.register(UnitConverterTool::new());

        let preamble = research_preamble(&registry).unwrap();
        assert!(preamble.contains("- calculator:"));
        assert!(preamble.contains("- unit_converter:"));
        assert!(preamble.contains("step by step"));
    }
}
