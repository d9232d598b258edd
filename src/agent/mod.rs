//! Agent module - provider selection, prompt templates, and the rig bridge
//!
//! The agent delegates its reasoning loop to rig-core: tools registered
//! locally are adapted to rig's `Tool` trait and exposed to the provider's
//! native function calling, with a preamble describing the working style.

mod bridge;
mod client;
pub mod prompts;

pub use bridge::RigToolAdapter;
pub use client::{ResearchAgent, MAX_TOOL_TURNS};
pub use prompts::{research_preamble, PromptTemplate};
