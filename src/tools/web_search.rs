//! Web search tool
//!
//! Queries the DuckDuckGo Instant Answer API (no API key required) and
//! reports the first of: abstract, definition, instant answer, related
//! topics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use super::urlencoding;
use crate::error::Result;

const SEARCH_TIMEOUT_SECS: u64 = 10;
const MAX_RELATED_TOPICS: usize = 3;

/// DuckDuckGo Instant Answer API response
#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Definition", default)]
    definition: String,
    #[serde(rename = "DefinitionURL", default)]
    definition_url: String,
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
}

/// Built-in tool: web search without an API key
pub struct WebSearchTool {
    client: Client,
    base_url: String,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self::with_base_url("https://api.duckduckgo.com".to_string())
    }

    /// Point the tool at a different endpoint (used by tests).
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .user_agent(concat!("reagent/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");
        WebSearchTool { client, base_url }
    }

    async fn search(&self, query: &str) -> ToolResult {
        let url = format!(
            "{}/?q={}&format=json&no_html=1&skip_disambig=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return ToolResult::failure(format!("Search error: {}", e)),
        };

        if !response.status().is_success() {
            return ToolResult::failure(format!(
                "Search failed with status code: {}",
                response.status().as_u16()
            ));
        }

        let answer: InstantAnswer = match response.json().await {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(format!("Search error: {}", e)),
        };

        ToolResult::success(summarize(query, &answer))
    }
}

/// Pick the most specific piece of the instant answer, in fixed order.
fn summarize(query: &str, answer: &InstantAnswer) -> String {
    if !answer.abstract_text.is_empty() {
        return format!(
            "Search results for '{}':\n{}\nSource: {}",
            query, answer.abstract_text, answer.abstract_url
        );
    }
    if !answer.definition.is_empty() {
        return format!(
            "Definition for '{}':\n{}\nSource: {}",
            query, answer.definition, answer.definition_url
        );
    }
    if !answer.answer.is_empty() {
        return format!("Answer for '{}':\n{}", query, answer.answer);
    }

    let topics: Vec<&str> = answer
        .related_topics
        .iter()
        .filter_map(|t| t.text.as_deref())
        .take(MAX_RELATED_TOPICS)
        .collect();
    if !topics.is_empty() {
        return format!("Related information for '{}':\n{}", query, topics.join("\n"));
    }

    format!(
        "No specific information found for '{}'. Try a more specific search term.",
        query
    )
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information. Input should be a search query string."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| crate::Error::InvalidInput("Missing 'query' parameter".to_string()))?;

        Ok(self.search(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_abstract_takes_priority() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Abstract": "Rust is a systems programming language.",
                "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
                "Answer": "ignored",
                "RelatedTopics": []
            })))
            .mount(&server)
            .await;

        let tool = WebSearchTool::with_base_url(server.uri());
        let result = tool
            .execute(serde_json::json!({"query": "rust language"}))
            .await
            .unwrap();
        assert!(result.success);
        let content = result.content.unwrap();
        assert!(content.contains("systems programming language"));
        assert!(content.contains("wikipedia"));
    }

    #[tokio::test]
    async fn test_related_topics_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "RelatedTopics": [
                    {"Text": "Topic one"},
                    {"Text": "Topic two"},
                    {"Text": "Topic three"},
                    {"Text": "Topic four"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = WebSearchTool::with_base_url(server.uri());
        let result = tool
            .execute(serde_json::json!({"query": "something"}))
            .await
            .unwrap();
        let content = result.content.unwrap();
        assert!(content.contains("Topic one"));
        assert!(content.contains("Topic three"));
        assert!(!content.contains("Topic four"));
    }

    #[tokio::test]
    async fn test_empty_answer_suggests_rephrasing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let tool = WebSearchTool::with_base_url(server.uri());
        let result = tool
            .execute(serde_json::json!({"query": "xyzzy"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result
            .content
            .unwrap()
            .contains("No specific information found"));
    }

    #[tokio::test]
    async fn test_http_failure_is_a_failure_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tool = WebSearchTool::with_base_url(server.uri());
        let result = tool
            .execute(serde_json::json!({"query": "anything"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("500"));
    }
}
