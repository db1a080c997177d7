//! Job-queue endpoint invoker
//!
//! Each call is a synchronous job: `POST {base}/runsync` with a
//! `tool_call` input, then the top-level `status` of the reply decides the
//! outcome.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, trace};

use super::{InvokeError, ToolInvoker, ToolOutcome};

/// Calls tools through a job endpoint
pub struct JobEndpointInvoker {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JobEndpointInvoker {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build from the endpoint section of the config
    pub fn from_config(config: &savant_config::EndpointConfig) -> Self {
        Self::new(config.base_url(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ToolInvoker for JobEndpointInvoker {
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &Value,
        timeout: Duration,
    ) -> Result<ToolOutcome, InvokeError> {
        let url = format!("{}/runsync", self.base_url);
        let payload = json!({
            "input": {
                "mode": "tool_call",
                "tool": tool_name,
                "arguments": arguments,
            }
        });

        trace!("submitting {} job to {}", tool_name, url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        debug!(
            "job for {} finished with status {}",
            tool_name,
            body["status"].as_str().unwrap_or("<none>")
        );

        Ok(interpret_job_response(&body))
    }
}

/// Map a `/runsync` reply to a tool outcome.
///
/// Queued or running jobs are reported back as errors; the caller does not
/// poll again.
pub fn interpret_job_response(body: &Value) -> ToolOutcome {
    let status = body["status"].as_str().unwrap_or_default();

    match status {
        "FAILED" => {
            let error = match &body["error"] {
                Value::Null => "Unknown error".to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return ToolOutcome::error(format!("Error: {}", error));
        }
        "IN_QUEUE" | "IN_PROGRESS" => {
            let state = status.to_lowercase().replace('_', " ");
            return ToolOutcome::error(format!("Error: Job {} - try again later", state));
        }
        _ => {}
    }

    let output = &body["output"];
    if let Some(result) = output.get("result") {
        return ToolOutcome::success(render(result));
    }
    if let Some(error) = output.get("error") {
        return ToolOutcome::error(format!("Error: {}", render(error)));
    }

    match output {
        Value::Null => ToolOutcome::success("{}"),
        other => ToolOutcome::success(render(other)),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
