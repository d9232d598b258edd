//! # Reagent
//!
//! A tool-using research agent with an MCP calculator server, built in Rust.
//!
//! ## Features
//!
//! - **Local Tool Suite:** Calculator, unit converter, file system, code
//!   analysis, HTTP, SQLite, script runner, and web search tools
//! - **Safe Expression Evaluation:** A real parser with an allow-listed
//!   function set instead of dynamic evaluation
//! - **MCP Support:** A newline-delimited JSON-RPC stdio server plus a
//!   client that mounts remote MCP tools alongside local ones
//! - **Multi-Provider:** DeepSeek, OpenAI, or Anthropic via rig-core

pub mod agent;
pub mod calc;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod units;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
