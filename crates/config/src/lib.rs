//! Configuration management for Savant
//!
//! Loads and saves research parameters, overlays credentials from the
//! environment and checks that a run has what it needs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// How tool calls requested by the model get executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Tools are declared locally and executed through the job endpoint
    #[default]
    Local,
    /// Tools run on remote gateways on behalf of the inference service
    Delegated,
}

/// Which text blocks make up the final answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnswerScope {
    /// Every text block seen during the run, in order
    #[default]
    Run,
    /// Only the text of the response that ended the run
    FinalTurn,
}

/// Inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    8096
}

/// Research loop defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefaults {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub answer_scope: AnswerScope,
    #[serde(default = "default_continuation_prompt")]
    pub continuation_prompt: String,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: default_tool_timeout_secs(),
            answer_scope: AnswerScope::default(),
            continuation_prompt: default_continuation_prompt(),
            verbose: default_verbose(),
            profile: default_profile(),
        }
    }
}

fn default_max_iterations() -> u32 {
    20
}

fn default_tool_timeout_secs() -> u64 {
    120
}

fn default_continuation_prompt() -> String {
    "Please continue analyzing the results and provide your answer.".to_string()
}

fn default_verbose() -> bool {
    true
}

fn default_profile() -> String {
    "papers".to_string()
}

/// Job endpoint used for locally declared tools
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EndpointConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub endpoint_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl EndpointConfig {
    /// Base URL of the job endpoint; `/runsync` is appended per call
    pub fn base_url(&self) -> String {
        match &self.api_base {
            Some(base) if !base.is_empty() => base.trim_end_matches('/').to_string(),
            _ => format!("https://api.runpod.ai/v2/{}", self.endpoint_id),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && (!self.endpoint_id.is_empty() || self.api_base.is_some())
    }
}

/// Remote tool gateway the inference service may call on our behalf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_token: Option<String>,
    /// Environment variable holding the token when it is not stored inline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl GatewayConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            authorization_token: None,
            token_env: None,
        }
    }

    pub fn with_token_env(mut self, var: impl Into<String>) -> Self {
        self.token_env = Some(var.into());
        self
    }

    /// Whether this gateway expects a token we do not have
    pub fn missing_token(&self) -> bool {
        self.token_env.is_some() && self.authorization_token.is_none()
    }
}

fn default_gateways() -> Vec<GatewayConfig> {
    vec![
        GatewayConfig::new("pubmed", "https://pubmed.mcp.claude.com/mcp"),
        GatewayConfig::new(
            "paper_rag",
            "https://m76rjhx9i3.us-east-1.awsapprunner.com/mcp",
        )
        .with_token_env("PAPERRAG_API_KEY"),
        GatewayConfig::new("scholar_gateway", "https://connector.scholargateway.ai/mcp")
            .with_token_env("SCHOLAR_GATEWAY_TOKEN"),
    ]
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub agent: AgentDefaults,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default = "default_gateways")]
    pub gateways: Vec<GatewayConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            agent: AgentDefaults::default(),
            endpoint: EndpointConfig::default(),
            gateways: default_gateways(),
        }
    }
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from specific location, falling back to defaults when absent
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("reading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("writing config to {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Overlay credentials from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay credentials using a custom lookup. Values already present in
    /// the file win over the environment; empty variables are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.provider.api_key.is_empty() {
            if let Some(key) = lookup("ANTHROPIC_API_KEY") {
                self.provider.api_key = key;
            }
        }
        if self.provider.api_base.is_none() {
            self.provider.api_base = lookup("ANTHROPIC_BASE_URL");
        }
        if self.endpoint.api_key.is_empty() {
            if let Some(key) = lookup("RUNPOD_API_KEY") {
                self.endpoint.api_key = key;
            }
        }
        if self.endpoint.endpoint_id.is_empty() {
            if let Some(id) = lookup("RUNPOD_ENDPOINT_ID") {
                self.endpoint.endpoint_id = id;
            }
        }

        for gateway in &mut self.gateways {
            if gateway.authorization_token.is_some() {
                continue;
            }
            if let Some(var) = &gateway.token_env {
                gateway.authorization_token = lookup(var);
            }
        }
    }

    /// Inference API key, if any
    pub fn api_key(&self) -> Option<String> {
        if self.provider.api_key.is_empty() {
            None
        } else {
            Some(self.provider.api_key.clone())
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Look up a gateway by name
    pub fn gateway(&self, name: &str) -> Option<&GatewayConfig> {
        self.gateways.iter().find(|g| g.name == name)
    }

    /// Check that a run in `mode` has everything it needs
    pub fn validate(&self, mode: DispatchMode) -> Result<()> {
        if !self.has_api_key() {
            return Err(ConfigError::Invalid(
                "ANTHROPIC_API_KEY is not set".to_string(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_iterations must be greater than zero".to_string(),
            ));
        }
        match mode {
            DispatchMode::Local => {
                if self.endpoint.api_key.is_empty() {
                    return Err(ConfigError::Invalid(
                        "RUNPOD_API_KEY is not set".to_string(),
                    ));
                }
                if self.endpoint.endpoint_id.is_empty() && self.endpoint.api_base.is_none() {
                    return Err(ConfigError::Invalid(
                        "RUNPOD_ENDPOINT_ID is not set".to_string(),
                    ));
                }
            }
            DispatchMode::Delegated => {
                if self.gateways.is_empty() {
                    return Err(ConfigError::Invalid(
                        "no tool gateways configured".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Create the data directory and a default config file
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("wrote default config to {:?}", config_path);
    }

    Config::load().await
}
