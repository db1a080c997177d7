//! Agent loop - core research engine

use std::sync::Arc;
use tracing::{debug, info, warn};

use savant_config::{AnswerScope, Config};
use savant_provider::{ChatParams, ContentBlock, Provider, StopReason};

use crate::answer::AnswerBuffer;
use crate::dispatch::ToolDispatch;
use crate::progress;
use crate::tools::ToolOutcome;
use crate::transcript::Transcript;
use crate::turn::{ToolRequest, Turn};
use crate::{AgentError, Result};

/// Returned in place of an answer when the iteration budget runs out
pub const MAX_ITERATIONS_MESSAGE: &str =
    "Error: Maximum iterations reached without completing the research.";

/// Loop parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub model: String,
    pub max_tokens: u32,
    /// Upper bound on inference calls per run
    pub max_iterations: u32,
    pub verbose: bool,
    pub answer_scope: AnswerScope,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LoopConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.provider.model.clone(),
            max_tokens: config.provider.max_tokens,
            max_iterations: config.agent.max_iterations,
            verbose: config.agent.verbose,
            answer_scope: config.agent.answer_scope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Done,
    Aborted,
}

/// One resolved tool request
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub request: ToolRequest,
    pub outcome: ToolOutcome,
}

/// Everything observable about a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub answer: String,
    pub state: LoopState,
    pub inference_calls: u32,
    pub tool_calls: Vec<ToolCall>,
    pub transcript: Transcript,
}

/// Drives one question through inference and tool calls
pub struct AgentLoop<P: Provider, D: ToolDispatch> {
    provider: Arc<P>,
    dispatch: D,
    config: LoopConfig,
    system_prompt: String,
}

impl<P: Provider, D: ToolDispatch> AgentLoop<P, D> {
    pub fn new(provider: P, dispatch: D, config: LoopConfig) -> Self {
        Self::with_shared_provider(Arc::new(provider), dispatch, config)
    }

    pub fn with_shared_provider(provider: Arc<P>, dispatch: D, config: LoopConfig) -> Self {
        Self {
            provider,
            dispatch,
            config,
            system_prompt: String::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn dispatch(&self) -> &D {
        &self.dispatch
    }

    /// Answer a question. Running out of iterations is not an error: the
    /// answer is then [`MAX_ITERATIONS_MESSAGE`].
    pub async fn run(&self, question: &str, verbose: bool) -> Result<String> {
        let report = self.drive(question, verbose).await?;
        Ok(report.answer)
    }

    /// Like [`run`](Self::run), keeping the transcript and tool history
    pub async fn run_report(&self, question: &str) -> Result<RunReport> {
        self.drive(question, self.config.verbose).await
    }

    async fn drive(&self, question: &str, verbose: bool) -> Result<RunReport> {
        if self.config.max_iterations == 0 {
            return Err(AgentError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let mut transcript = Transcript::new(question);
        let mut answer = AnswerBuffer::new(self.config.answer_scope);
        let mut tool_calls = Vec::new();
        let mut iteration = 0;

        if verbose {
            info!(
                "Researching with {} dispatch: {}",
                format!("{:?}", self.dispatch.mode()).to_lowercase(),
                question
            );
        }

        let mut state = LoopState::Running;
        while state == LoopState::Running {
            iteration += 1;
            if iteration > self.config.max_iterations {
                warn!(
                    "stopping after {} inference calls without an answer",
                    self.config.max_iterations
                );
                state = LoopState::Aborted;
                continue;
            }

            debug!("Agent iteration {}", iteration);

            let params = ChatParams {
                model: self.config.model.clone(),
                max_tokens: self.config.max_tokens,
                system: self.system_prompt.clone(),
                messages: transcript.messages().to_vec(),
                tools: self.dispatch.tool_definitions(),
                mcp_servers: self.dispatch.mcp_servers(),
            };

            let response = self.provider.chat(params).await?;
            let turn = Turn::partition(&response.content);
            answer.observe(&turn.text);

            if !turn.has_requests() {
                if response.stop_reason != StopReason::EndTurn {
                    warn!(
                        "response stopped with {:?} and no tool requests; finishing",
                        response.stop_reason
                    );
                }
                state = LoopState::Done;
                continue;
            }

            let returns_results = self.dispatch.returns_results();
            let mut results: Vec<ContentBlock> = Vec::new();
            for request in turn.requests {
                progress::report_request(verbose, &request);
                let outcome = self.dispatch.resolve(&request).await;
                progress::report_outcome(verbose, &request, &outcome);

                if returns_results {
                    results.push(ContentBlock::tool_result(
                        &request.id,
                        &outcome.content,
                        outcome.is_error,
                    ));
                }
                tool_calls.push(ToolCall { request, outcome });
            }

            transcript.push_assistant(response.content);
            transcript.push(self.dispatch.follow_up(results));
        }

        let answer = match state {
            LoopState::Aborted => MAX_ITERATIONS_MESSAGE.to_string(),
            _ => answer.into_answer(),
        };

        if verbose {
            info!(
                "Research finished after {} inference calls and {} tool calls",
                iteration.min(self.config.max_iterations),
                tool_calls.len()
            );
        }

        Ok(RunReport {
            answer,
            state,
            inference_calls: iteration.min(self.config.max_iterations),
            tool_calls,
            transcript,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_config_from_config() {
        let mut config = Config::default();
        config.agent.max_iterations = 7;
        config.agent.answer_scope = AnswerScope::FinalTurn;
        config.provider.model = "claude-test".to_string();

        let loop_config = LoopConfig::from_config(&config);

        assert_eq!(loop_config.max_iterations, 7);
        assert_eq!(loop_config.answer_scope, AnswerScope::FinalTurn);
        assert_eq!(loop_config.model, "claude-test");
        assert_eq!(loop_config.max_tokens, 8096);
    }

    #[test]
    fn test_default_loop_config() {
        let config = LoopConfig::default();
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.answer_scope, AnswerScope::Run);
    }
}
