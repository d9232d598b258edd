//! HTTP request tool
//!
//! Bounded GET/POST against external APIs with a fixed 10-second timeout.
//! The operation is a tagged enum instead of a `GET:url` string, so URLs
//! with embedded colons need no escaping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::error::Result;

/// Fixed timeout for outbound requests
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Response bodies are truncated to this many characters in observations
const BODY_PREVIEW_CHARS: usize = 500;

/// A validated HTTP operation
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum HttpOperation {
    /// GET the given URL
    Get { url: String },
    /// POST a JSON body to the given URL
    Post { url: String, body: Value },
}

/// Built-in tool: HTTP client for external APIs
pub struct HttpRequestTool {
    client: Client,
}

impl Default for HttpRequestTool {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequestTool {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("reagent/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");
        HttpRequestTool { client }
    }

    async fn perform(&self, op: HttpOperation) -> ToolResult {
        let (label, url, request) = match op {
            HttpOperation::Get { url } => ("GET", url.clone(), self.client.get(&url)),
            HttpOperation::Post { url, body } => {
                ("POST", url.clone(), self.client.post(&url).json(&body))
            }
        };

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return ToolResult::failure(format!("Request error: {}", e)),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();

        ToolResult::success(format!(
            "{} {}\nStatus: {}\nResponse: {}",
            label,
            url,
            status.as_u16(),
            preview
        ))
    }
}

#[async_trait]
impl Tool for HttpRequestTool {
    fn name(&self) -> &str {
        "api_request"
    }

    fn description(&self) -> &str {
        "Make HTTP requests to APIs. \
         Use {\"op\": \"get\", \"url\": ...} or {\"op\": \"post\", \"url\": ..., \"body\": {...}}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "op": {
                    "type": "string",
                    "enum": ["get", "post"],
                    "description": "HTTP method"
                },
                "url": {
                    "type": "string",
                    "description": "Target URL"
                },
                "body": {
                    "type": "object",
                    "description": "JSON body (post only)"
                }
            },
            "required": ["op", "url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let op: HttpOperation = match serde_json::from_value(args) {
            Ok(op) => op,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "Invalid request format: {}",
                    e
                )))
            }
        };
        Ok(self.perform(op).await)
    }
}
