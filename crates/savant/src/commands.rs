//! Savant command implementations

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use savant_agent::{
    AgentLoop, DelegatedDispatch, DispatchMode, JobEndpointInvoker, LocalDispatch, LoopConfig,
    ToolDispatch,
};
use savant_config::Config;
use savant_provider::AnthropicProvider;

use crate::profiles::{self, Profile};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Options of the `ask` command
#[derive(Debug, Default)]
pub struct AskOptions {
    pub question: Vec<String>,
    pub profile: Option<Profile>,
    pub max_iterations: Option<u32>,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

async fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().await.context("failed to load config")?,
    };
    config.apply_env();
    Ok(config)
}

/// Read line from stdin
fn read_line() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Answer one research question
pub async fn ask_command(options: AskOptions) -> Result<()> {
    let mut config = load_config(options.config.as_ref()).await?;
    if let Some(max) = options.max_iterations {
        config.agent.max_iterations = max;
    }

    let profile = match options.profile {
        Some(profile) => profile,
        None => Profile::parse(&config.agent.profile)?,
    };
    config
        .validate(profile.mode())
        .context("configuration is incomplete; run `savant status` for details")?;

    println!("◆ {}", profile.title());
    println!("{}", RULE);

    let mut question = options.question.join(" ").trim().to_string();
    if question.is_empty() {
        println!("Enter your research question:");
        print!("> ");
        std::io::stdout().flush()?;
        question = read_line()?;
        if question.is_empty() {
            println!("No question provided. Exiting.");
            return Ok(());
        }
    }

    let verbose = config.agent.verbose && !options.quiet;
    let mut loop_config = LoopConfig::from_config(&config);
    loop_config.verbose = verbose;

    let provider = AnthropicProvider::new(
        config.provider.api_key.clone(),
        config.provider.api_base.clone(),
        Some(config.provider.model.clone()),
    );

    let answer = match profile.mode() {
        DispatchMode::Local => {
            let invoker = JobEndpointInvoker::from_config(&config.endpoint);
            debug!("tool calls go to {}", invoker.base_url());
            let dispatch = LocalDispatch::new(invoker, profiles::papers_catalog()?)
                .with_timeout(Duration::from_secs(config.agent.tool_timeout_secs));
            research(provider, dispatch, loop_config, profile, &question).await?
        }
        DispatchMode::Delegated => {
            let servers = profiles::gateway_servers(profile, &config)?;
            let dispatch = DelegatedDispatch::new(servers, config.agent.continuation_prompt.clone());
            research(provider, dispatch, loop_config, profile, &question).await?
        }
    };

    println!();
    println!("{}", RULE);
    println!("  Answer");
    println!("{}", RULE);
    println!();
    println!("{}", answer);

    Ok(())
}

async fn research<D: ToolDispatch>(
    provider: AnthropicProvider,
    dispatch: D,
    loop_config: LoopConfig,
    profile: Profile,
    question: &str,
) -> Result<String> {
    let verbose = loop_config.verbose;
    let agent =
        AgentLoop::new(provider, dispatch, loop_config).with_system_prompt(profile.system_prompt());

    let answer = agent
        .run(question, verbose)
        .await
        .context("research run failed")?;
    Ok(answer)
}

/// Initialize config and data directory
pub async fn init_command() -> Result<()> {
    println!("◆ Initializing Savant...");
    println!("{}", RULE);

    savant_config::paths::ensure_dir(&savant_config::data_dir()).await?;
    let config = savant_config::init().await?;
    info!("default profile is {}", config.agent.profile);

    println!("\n◆ Savant initialized");
    println!("Config: {}", savant_config::config_path().display());
    println!("\nNext steps:");
    println!("  1. export ANTHROPIC_API_KEY=...");
    println!("  2. For the papers profile: export RUNPOD_API_KEY=... RUNPOD_ENDPOINT_ID=...");
    println!("  3. Ask a question: savant ask \"What are recent advances in organic solar cells?\"");

    Ok(())
}

fn mark(set: bool) -> &'static str {
    if set {
        "[Set]"
    } else {
        "[Missing]"
    }
}

/// Show which credentials and gateways are configured
pub async fn status_command(config: Option<PathBuf>) -> Result<()> {
    let config_path = config.unwrap_or_else(savant_config::config_path);

    println!("◆ Savant Status");
    println!("{}", RULE);
    println!(
        "Config:    {} {}",
        config_path.display(),
        if config_path.exists() { "[OK]" } else { "[Missing]" }
    );

    let config = load_config(Some(&config_path)).await?;

    println!("Model:     {}", config.provider.model);
    println!("API Key:   {}", mark(config.has_api_key()));
    println!("Profile:   {}", config.agent.profile);
    println!("Max iterations: {}", config.agent.max_iterations);
    println!(
        "Endpoint:  {} {}",
        config.endpoint.base_url(),
        mark(config.endpoint.is_configured())
    );

    println!("Gateways:");
    for gateway in &config.gateways {
        let token = match (&gateway.token_env, &gateway.authorization_token) {
            (_, Some(_)) => "[Token set]".to_string(),
            (Some(var), None) => format!("[Missing {}]", var),
            (None, None) => "[No token needed]".to_string(),
        };
        println!("  {:<16} {} {}", gateway.name, gateway.url, token);
    }

    Ok(())
}
