//! Research agent built on rig-core's providers
//!
//! The reasoning loop itself is delegated to rig: we hand the provider a
//! preamble plus the local tool set and let its native function calling
//! alternate between model turns and tool executions.

use std::sync::Arc;

use rig::agent::AgentBuilder;
use rig::client::CompletionClient;
use rig::completion::{CompletionModel, Prompt};
use rig::providers::{anthropic, deepseek, openai};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::agent::bridge::RigToolAdapter;
use crate::agent::prompts;
use crate::config::{LlmBackend, ProviderConfig};
use crate::error::{Error, Result};
use crate::tools::ToolRegistry;

/// Upper bound on model/tool round trips for a single question
pub const MAX_TOOL_TURNS: usize = 10;

/// A tool-using research agent bound to one provider
pub struct ResearchAgent {
    provider: ProviderConfig,
    registry: Arc<ToolRegistry>,
}

impl ResearchAgent {
    /// Create an agent over an explicit provider and tool set
    pub fn new(provider: ProviderConfig, registry: Arc<ToolRegistry>) -> Self {
        Self { provider, registry }
    }

    /// Create an agent from environment variables
    pub fn from_env(registry: Arc<ToolRegistry>) -> Result<Self> {
        let provider = ProviderConfig::from_env()?;
        Ok(Self::new(provider, registry))
    }

    /// The backend this agent talks to
    pub fn backend(&self) -> LlmBackend {
        self.provider.backend
    }

    /// The model this agent prompts
    pub fn model(&self) -> &str {
        &self.provider.model
    }

    /// Answer a question, running tool calls as the model requests them
    pub async fn run(&self, question: &str) -> Result<String> {
        info!(backend = %self.provider.backend, model = %self.provider.model, "running agent");
        let preamble = prompts::research_preamble(&self.registry)?;

        match self.provider.backend {
            LlmBackend::DeepSeek => {
                let client: deepseek::Client = deepseek::Client::new(self.provider.api_key.expose_secret())
                    .map_err(|e| Error::Config(format!("Failed to create DeepSeek client: {}", e)))?;
                self.prompt_with(client.agent(&self.provider.model), &preamble, question)
                    .await
            }
            LlmBackend::OpenAi => {
                let client: openai::Client = openai::Client::new(self.provider.api_key.expose_secret())
                    .map_err(|e| Error::Config(format!("Failed to create OpenAI client: {}", e)))?;
                self.prompt_with(client.agent(&self.provider.model), &preamble, question)
                    .await
            }
            LlmBackend::Anthropic => {
                let client: anthropic::Client = anthropic::Client::new(self.provider.api_key.expose_secret())
                    .map_err(|e| Error::Config(format!("Failed to create Anthropic client: {}", e)))?;
                self.prompt_with(client.agent(&self.provider.model), &preamble, question)
                    .await
            }
        }
    }

    async fn prompt_with<M: CompletionModel>(
        &self,
        builder: AgentBuilder<M>,
        preamble: &str,
        question: &str,
    ) -> Result<String> {
        let mut builder = builder.preamble(preamble).tools(Vec::new());
        for tool in self.registry.iter() {
            debug!(tool = tool.name(), "registering tool with agent");
            builder = builder.tool(RigToolAdapter::new(tool));
        }

        let agent = builder.build();
        agent
            .prompt(question)
            .max_turns(MAX_TOOL_TURNS)
            .await
            .map_err(|e| Error::Provider(format!("Completion failed: {}", e)))
    }
}
