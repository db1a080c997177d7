//! Anthropic Messages API provider
//!
//! Native `tool_use` / `tool_result` blocks for locally declared tools, and
//! the MCP connector beta (`mcp_servers` + `mcp_toolset`) for gateways the
//! service calls itself.

use crate::*;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, trace, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MCP_BETA: &str = "mcp-client-2025-11-20";
const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl AnthropicProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        let api_base = api_base
            .filter(|b| !b.is_empty())
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            api_base,
            default_model: default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn build_request(&self, params: &ChatParams) -> serde_json::Value {
        let model = if params.model.is_empty() {
            self.default_model.clone()
        } else {
            params.model.clone()
        };

        let mut body = json!({
            "model": model,
            "max_tokens": params.max_tokens,
            "messages": params.messages,
        });

        if !params.system.is_empty() {
            body["system"] = json!(params.system);
        }

        if !params.mcp_servers.is_empty() {
            let toolsets: Vec<McpToolset> =
                params.mcp_servers.iter().map(McpServer::toolset).collect();
            body["mcp_servers"] = json!(params.mcp_servers);
            body["tools"] = json!(toolsets);
        } else if !params.tools.is_empty() {
            body["tools"] = json!(params.tools);
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse> {
        let blocks = json["content"]
            .as_array()
            .ok_or(ProviderError::InvalidResponse)?;

        let mut content = Vec::with_capacity(blocks.len());
        for block in blocks {
            match serde_json::from_value::<ContentBlock>(block.clone()) {
                Ok(parsed) => content.push(parsed),
                Err(e) => warn!("skipping {} block: {}", block["type"], e),
            }
        }

        let stop_reason =
            serde_json::from_value(json["stop_reason"].clone()).unwrap_or(StopReason::Unknown);

        let usage = match json["usage"].as_object() {
            Some(usage) => Usage {
                input_tokens: usage
                    .get("input_tokens")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as u32,
                output_tokens: usage
                    .get("output_tokens")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as u32,
            },
            None => Usage::default(),
        };

        Ok(ChatResponse {
            content,
            stop_reason,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl Provider for AnthropicProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NoApiKey);
        }

        trace!("calling {}", self.api_base);

        let url = format!("{}/v1/messages", self.api_base);
        let body = self.build_request(&params);

        let mut request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json");
        if !params.mcp_servers.is_empty() {
            request = request.header("anthropic-beta", MCP_BETA);
        }

        let response = request.json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            let error = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, text));
            return Err(ProviderError::Api(error));
        }

        let json: serde_json::Value = serde_json::from_str(&text)?;
        let response = self.parse_response(json)?;

        debug!(
            "response: stop_reason={:?}, {} blocks, {} output tokens",
            response.stop_reason,
            response.content.len(),
            response.usage.output_tokens
        );

        Ok(response)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
