//! Inference provider layer
//!
//! Wire data model for tool-augmented conversations and the `Provider` trait
//! the research loop talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use thiserror::Error;

pub mod anthropic;

pub use anthropic::AnthropicProvider;

/// Inference service errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("no API key configured")]
    NoApiKey,

    #[error("invalid response")]
    InvalidResponse,

    #[error("rate limited")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One block of turn content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Model asks for a locally declared tool
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// Outcome of a local tool call, correlated by `tool_use_id`
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
    /// Tool call the inference service ran against a gateway
    McpToolUse {
        id: String,
        name: String,
        server_name: String,
        input: Value,
    },
    /// Gateway result embedded in the response; content is kept verbatim
    McpToolResult {
        tool_use_id: String,
        #[serde(default)]
        is_error: bool,
        #[serde(default)]
        content: Value,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(
        tool_use_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error,
        }
    }

    pub fn mcp_tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        server_name: impl Into<String>,
        input: Value,
    ) -> Self {
        ContentBlock::McpToolUse {
            id: id.into(),
            name: name.into(),
            server_name: server_name.into(),
            input,
        }
    }

    pub fn mcp_tool_result(tool_use_id: impl Into<String>, text: &str, is_error: bool) -> Self {
        ContentBlock::McpToolResult {
            tool_use_id: tool_use_id.into(),
            is_error,
            content: serde_json::json!([{ "type": "text", "text": text }]),
        }
    }

    /// Whether this block asks for a tool, local or delegated
    pub fn is_tool_request(&self) -> bool {
        matches!(
            self,
            ContentBlock::ToolUse { .. } | ContentBlock::McpToolUse { .. }
        )
    }
}

/// Flatten gateway result content (a string or a list of text blocks)
pub fn flatten_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One turn of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentBlock::text(text)])
    }

    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Concatenated text blocks of this turn
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Catalog entry offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Remote tool gateway descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServer {
    #[serde(rename = "type")]
    pub server_type: String,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_token: Option<String>,
}

impl McpServer {
    pub fn url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            server_type: "url".to_string(),
            url: url.into(),
            name: name.into(),
            authorization_token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.authorization_token = token;
        self
    }

    /// Toolset reference exposing every tool of this server
    pub fn toolset(&self) -> McpToolset {
        McpToolset {
            toolset_type: "mcp_toolset".to_string(),
            mcp_server_name: self.name.clone(),
        }
    }
}

/// Toolset reference paired with a gateway descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolset {
    #[serde(rename = "type")]
    pub toolset_type: String,
    pub mcp_server_name: String,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    PauseTurn,
    Refusal,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Token accounting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Inference response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: StopReason,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    /// Plain text reply that ends the turn
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(content)],
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        }
    }

    pub fn new(content: Vec<ContentBlock>, stop_reason: StopReason) -> Self {
        Self {
            content,
            stop_reason,
            usage: Usage::default(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content.iter().any(ContentBlock::is_tool_request)
    }

    pub fn is_end_turn(&self) -> bool {
        self.stop_reason == StopReason::EndTurn
    }

    /// Concatenated text blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Inference request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    /// Gateways the service should call itself; enables the MCP beta
    pub mcp_servers: Vec<McpServer>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 8096,
            system: String::new(),
            messages: Vec::new(),
            tools: Vec::new(),
            mcp_servers: Vec::new(),
        }
    }
}

/// Inference service
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse>;
    fn default_model(&self) -> String;
    fn is_configured(&self) -> bool;
}
