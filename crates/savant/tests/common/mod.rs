//! Common test utilities for Savant integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Isolated home directory with no credentials in the environment
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let data_dir = temp_dir.path().join(".savant");
        Ok(Self { temp_dir, data_dir })
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Command running the savant binary against this environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_savant"));
        cmd.env("HOME", self.temp_dir.path());
        for var in [
            "ANTHROPIC_API_KEY",
            "ANTHROPIC_BASE_URL",
            "RUNPOD_API_KEY",
            "RUNPOD_ENDPOINT_ID",
            "PAPERRAG_API_KEY",
            "SCHOLAR_GATEWAY_TOKEN",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Write a config file with an inference key and the given profile
    pub fn create_config(&self, profile: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let config = format!(
            r#"{{
  "provider": {{"api_key": "test-api-key"}},
  "agent": {{"profile": "{}", "max_iterations": 5}}
}}"#,
            profile
        );
        std::fs::write(self.config_file(), config)?;
        Ok(())
    }
}
