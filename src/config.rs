//! Configuration management for Reagent
//!
//! Everything comes from environment variables (optionally via a `.env`
//! file loaded by the binaries). The LLM backend is selected by which API
//! key is present, in a fixed precedence order.

use crate::{Error, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Supported LLM backends, in selection precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    DeepSeek,
    OpenAi,
    Anthropic,
}

impl LlmBackend {
    /// Environment variable carrying this backend's API key
    pub fn key_var(&self) -> &'static str {
        match self {
            LlmBackend::DeepSeek => "DEEPSEEK_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Default model for this backend
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::DeepSeek => "deepseek-chat",
            LlmBackend::OpenAi => "gpt-4o-mini",
            LlmBackend::Anthropic => "claude-3-5-sonnet-latest",
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmBackend::DeepSeek => write!(f, "deepseek"),
            LlmBackend::OpenAi => write!(f, "openai"),
            LlmBackend::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which backend was selected
    pub backend: LlmBackend,
    /// API key for the backend
    pub api_key: SecretString,
    /// Model to use
    pub model: String,
}

impl ProviderConfig {
    /// Select a provider from the environment.
    ///
    /// Checks `DEEPSEEK_API_KEY`, then `OPENAI_API_KEY`, then
    /// `ANTHROPIC_API_KEY`. All three absent is a fatal configuration
    /// error for the interactive demos. `REAGENT_MODEL` overrides the
    /// backend's default model.
    pub fn from_env() -> Result<Self> {
        let backends = [
            LlmBackend::DeepSeek,
            LlmBackend::OpenAi,
            LlmBackend::Anthropic,
        ];

        for backend in backends {
            if let Ok(key) = std::env::var(backend.key_var()) {
                if !key.trim().is_empty() {
                    let model = std::env::var("REAGENT_MODEL")
                        .unwrap_or_else(|_| backend.default_model().to_string());
                    return Ok(ProviderConfig {
                        backend,
                        api_key: SecretString::from(key),
                        model,
                    });
                }
            }
        }

        Err(Error::Config(
            "No API key found. Set DEEPSEEK_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY"
                .to_string(),
        ))
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the file tools are allowed to touch
    pub workspace: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `REAGENT_WORKSPACE` overrides the workspace root; the default is
    /// the current working directory.
    pub fn from_env() -> Result<Self> {
        let workspace = match std::env::var("REAGENT_WORKSPACE") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => std::env::current_dir()?,
        };
        Ok(Config { workspace })
    }
}
