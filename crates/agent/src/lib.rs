//! Research agent core
//!
//! Drives a tool-augmented conversation with the inference service until the
//! model settles on an answer or the iteration budget runs out.

use thiserror::Error;

pub mod answer;
pub mod dispatch;
pub mod loop_agent;
pub mod progress;
pub mod tools;
pub mod transcript;
pub mod turn;

pub use answer::AnswerBuffer;
pub use dispatch::{DelegatedDispatch, LocalDispatch, ToolDispatch};
pub use loop_agent::{
    AgentLoop, LoopConfig, LoopState, RunReport, ToolCall, MAX_ITERATIONS_MESSAGE,
};
pub use savant_config::{AnswerScope, DispatchMode};
pub use tools::{InvokeError, JobEndpointInvoker, ToolCatalog, ToolInvoker, ToolOutcome};
pub use transcript::Transcript;
pub use turn::{ToolRequest, Turn};

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("inference failed: {0}")]
    Provider(#[from] savant_provider::ProviderError),

    #[error("invalid loop configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
