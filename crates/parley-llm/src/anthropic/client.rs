// Anthropic Messages API client implementation

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API rejects requests without `max_tokens`
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic client (HTTP direct, no SDK)
///
/// Differs from the OpenAI surface in three ways:
/// - Auth header: `x-api-key` plus a pinned `anthropic-version`
/// - System prompts travel in a top-level `system` field, not as a message
/// - `max_tokens` is mandatory
pub struct AnthropicClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: ANTHROPIC_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build messages request payload, hoisting system messages into `system`
    fn build_messages_request(&self, model: &str, messages: &[Message], options: &ChatOptions) -> Value {
        let system = messages
            .iter()
            .filter(|m| m.is_system())
            .map(Message::content)
            .collect::<Vec<_>>()
            .join("\n\n");

        let turns: Vec<Value> = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| {
                serde_json::json!({
                    "role": m.role(),
                    "content": m.content(),
                })
            })
            .collect();

        let mut request = serde_json::json!({
            "model": model,
            "max_tokens": options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": turns,
        });

        if let Some(obj) = request.as_object_mut() {
            if !system.is_empty() {
                obj.insert("system".to_string(), serde_json::json!(system));
            }
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
        }

        request
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!("Anthropic messages request: model={}", request.model);
        let payload = self.build_messages_request(&request.model, &request.messages, &request.options);

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, error_text);
        }

        let raw: AnthropicMessagesResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let text = raw
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        Ok(ChatResponse {
            content: Some(text).filter(|t| !t.is_empty()),
            model: Some(raw.model.clone()),
            usage: raw.usage.as_ref().map(|usage| TokenUsage {
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            }),
            finish_reason: raw.stop_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicMessagesResponse {
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_are_hoisted() {
        let client = AnthropicClient::new("test-key").unwrap();
        let messages = vec![Message::system("be precise"), Message::human("hi")];

        let payload = client.build_messages_request("claude-3-haiku-20240307", &messages, &ChatOptions::new());

        assert_eq!(payload["system"], "be precise");
        let turns = payload["messages"].as_array().unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["role"], "user");
    }

    #[test]
    fn test_max_tokens_always_present() {
        let client = AnthropicClient::new("test-key").unwrap();
        let payload = client.build_messages_request("m", &[Message::human("hi")], &ChatOptions::new());
        assert_eq!(payload["max_tokens"], DEFAULT_MAX_TOKENS);

        let payload = client.build_messages_request(
            "m",
            &[Message::human("hi")],
            &ChatOptions::new().max_tokens(2048),
        );
        assert_eq!(payload["max_tokens"], 2048);
        assert!(payload.get("system").is_none());
    }
}
