//! Partitioning of one model response into text and tool requests

use savant_provider::{flatten_text, ContentBlock};
use serde_json::Value;
use tracing::warn;

use crate::tools::ToolOutcome;

/// A tool call the model asked for in this response
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub input: Value,
    /// Gateway that ran the call, for delegated requests
    pub server_name: Option<String>,
    /// Result already embedded in the response by the gateway
    pub embedded_result: Option<ToolOutcome>,
}

/// Text and tool requests of a single response, in response order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Turn {
    pub text: String,
    pub requests: Vec<ToolRequest>,
}

impl Turn {
    pub fn partition(content: &[ContentBlock]) -> Self {
        let mut turn = Turn::default();

        for block in content {
            match block {
                ContentBlock::Text { text } => turn.text.push_str(text),
                ContentBlock::ToolUse { id, name, input } => turn.requests.push(ToolRequest {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                    server_name: None,
                    embedded_result: None,
                }),
                ContentBlock::McpToolUse {
                    id,
                    name,
                    server_name,
                    input,
                } => turn.requests.push(ToolRequest {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                    server_name: Some(server_name.clone()),
                    embedded_result: None,
                }),
                ContentBlock::McpToolResult {
                    tool_use_id,
                    is_error,
                    content,
                } => {
                    let outcome = ToolOutcome {
                        content: flatten_text(content),
                        is_error: *is_error,
                    };
                    match turn.requests.iter_mut().find(|r| &r.id == tool_use_id) {
                        Some(request) => request.embedded_result = Some(outcome),
                        None => warn!("gateway result {} has no matching call", tool_use_id),
                    }
                }
                ContentBlock::ToolResult { tool_use_id, .. } => {
                    warn!("ignoring tool_result {} inside a model response", tool_use_id)
                }
            }
        }

        turn
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}
