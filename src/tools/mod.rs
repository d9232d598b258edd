//! Tools module - Modular tool system for agent capabilities
//!
//! Each tool is a self-contained module that implements the `Tool` trait.
//! Tools are registered into a `ToolRegistry` and made available to the LLM
//! for function calling.
//!
//! ## Built-in Tools
//!
//! - **calculator**: Safe expression evaluation over a parsed grammar
//! - **unit_converter**: Length/weight/temperature conversion
//! - **file_system**: Read/write files inside the workspace
//! - **code_analysis**: Summarize code files and directories
//! - **web_search**: DuckDuckGo Instant Answer search (no API key required)
//! - **api_request**: Bounded HTTP GET/POST
//! - **database**: Ephemeral in-memory SQLite operations
//! - **script**: Restricted calculator scripts
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `src/tools/` (e.g., `my_tool.rs`)
//! 2. Implement the `Tool` trait
//! 3. Add `mod my_tool;` and `pub use` in this file
//! 4. Register it in `basic_registry` or the binary entry points

mod calculator;
mod code_analysis;
mod database;
mod file_system;
mod http_request;
mod registry;
mod script;
mod traits;
mod unit_converter;
mod web_search;

use std::path::PathBuf;

// Core trait and types
pub use traits::{FunctionDefinition, Tool, ToolCall, ToolDefinition, ToolResult};

// Registry
pub use registry::ToolRegistry;

// Built-in tools
pub use calculator::CalculatorTool;
pub use code_analysis::CodeAnalysisTool;
pub use database::{DatabaseTool, DbOperation};
pub use file_system::{FileOperation, FileSystemTool};
pub use http_request::{HttpOperation, HttpRequestTool};
pub use script::ScriptTool;
pub use unit_converter::UnitConverterTool;
pub use web_search::WebSearchTool;

/// The seven basic tools, in their documented order.
pub const BASIC_TOOL_NAMES: &[&str] = &[
    "web_search",
    "code_analysis",
    "file_system",
    "calculator",
    "script",
    "api_request",
    "database",
];

/// Build a registry with the basic tool set.
///
/// `workspace` bounds the file system tool; everything else is
/// self-contained.
pub fn basic_registry(workspace: PathBuf) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WebSearchTool::new());
    registry.register(CodeAnalysisTool::new());
    registry.register(FileSystemTool::new(workspace));
    registry.register(CalculatorTool::new());
    registry.register(ScriptTool::new());
    registry.register(HttpRequestTool::new());
    registry.register(DatabaseTool::new());
    registry
}

/// URL encoding helper
pub(crate) mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
