//! Tool dispatch strategies
//!
//! The loop is written once; how tool requests get answered and how the
//! conversation continues afterwards is up to the injected strategy.

use async_trait::async_trait;
use savant_config::DispatchMode;
use savant_provider::{ContentBlock, McpServer, Message, ToolDefinition};
use std::time::Duration;
use tracing::warn;

use crate::tools::{ToolCatalog, ToolInvoker, ToolOutcome, DEFAULT_TOOL_TIMEOUT};
use crate::turn::ToolRequest;

#[async_trait]
pub trait ToolDispatch: Send + Sync {
    fn mode(&self) -> DispatchMode;

    /// Locally declared tools offered to the model
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Gateways the inference service should call itself
    fn mcp_servers(&self) -> Vec<McpServer>;

    /// Produce the outcome of one request. Never fails: problems come back
    /// as error outcomes so the model can react to them.
    async fn resolve(&self, request: &ToolRequest) -> ToolOutcome;

    /// Whether `follow_up` needs the `tool_result` blocks of the turn
    fn returns_results(&self) -> bool {
        true
    }

    /// The user turn that follows an assistant turn with tool requests.
    /// `results` is empty when `returns_results` is false.
    fn follow_up(&self, results: Vec<ContentBlock>) -> Message;
}

/// Runs catalog tools through a [`ToolInvoker`]
pub struct LocalDispatch<I: ToolInvoker> {
    invoker: I,
    catalog: ToolCatalog,
    timeout: Duration,
}

impl<I: ToolInvoker> LocalDispatch<I> {
    pub fn new(invoker: I, catalog: ToolCatalog) -> Self {
        Self {
            invoker,
            catalog,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }
}

#[async_trait]
impl<I: ToolInvoker> ToolDispatch for LocalDispatch<I> {
    fn mode(&self) -> DispatchMode {
        DispatchMode::Local
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.catalog.definitions()
    }

    fn mcp_servers(&self) -> Vec<McpServer> {
        Vec::new()
    }

    async fn resolve(&self, request: &ToolRequest) -> ToolOutcome {
        if !self.catalog.has(&request.name) {
            return ToolOutcome::error(format!("Error: Unknown tool '{}'", request.name));
        }

        match self
            .invoker
            .invoke(&request.name, &request.input, self.timeout)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("tool {} failed: {}", request.name, e);
                ToolOutcome::error(format!("Error calling tool: {}", e))
            }
        }
    }

    fn follow_up(&self, results: Vec<ContentBlock>) -> Message {
        Message::user(results)
    }
}

/// Tools run on remote gateways; results arrive inside the response
pub struct DelegatedDispatch {
    servers: Vec<McpServer>,
    continuation_prompt: String,
}

impl DelegatedDispatch {
    pub fn new(servers: Vec<McpServer>, continuation_prompt: impl Into<String>) -> Self {
        Self {
            servers,
            continuation_prompt: continuation_prompt.into(),
        }
    }
}

#[async_trait]
impl ToolDispatch for DelegatedDispatch {
    fn mode(&self) -> DispatchMode {
        DispatchMode::Delegated
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    fn mcp_servers(&self) -> Vec<McpServer> {
        self.servers.clone()
    }

    async fn resolve(&self, request: &ToolRequest) -> ToolOutcome {
        match &request.embedded_result {
            Some(outcome) => outcome.clone(),
            None => ToolOutcome::error(format!(
                "Error: no result returned for '{}'",
                request.name
            )),
        }
    }

    fn returns_results(&self) -> bool {
        false
    }

    fn follow_up(&self, _results: Vec<ContentBlock>) -> Message {
        Message::user_text(self.continuation_prompt.clone())
    }
}
