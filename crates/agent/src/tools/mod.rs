//! Tool catalog and invocation

pub mod endpoint;

pub use endpoint::{interpret_job_response, JobEndpointInvoker};

use async_trait::async_trait;
use savant_provider::ToolDefinition;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default per-call timeout for job endpoint round trips
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport-level failure while invoking a tool
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed endpoint response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Transport(String),
}

/// What a tool call produced, as fed back to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Executes one tool call against a remote service
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &Value,
        timeout: Duration,
    ) -> Result<ToolOutcome, InvokeError>;
}

/// Fixed set of tools offered to the model, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool, replacing any earlier definition with the same name
    pub fn register(&mut self, tool: ToolDefinition) {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn with(mut self, tool: ToolDefinition) -> Self {
        self.register(tool);
        self
    }

    /// Parse a JSON array of `{name, description, input_schema}` entries
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let tools: Vec<ToolDefinition> = serde_json::from_value(value)?;
        let mut catalog = Self::new();
        for tool in tools {
            catalog.register(tool);
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
