use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use tracing::error;

use crate::config::{ConfigError, VerifyConfig};
use crate::tracker::HttpTracker;
use crate::verify;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const CONFIG_ERROR_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "verify-tracker",
    version,
    about = "Run verification checks for a client and print a JSON report"
)]
pub struct VerifyArgs {
    /// Client name, matched against project names
    #[arg(long)]
    pub client: String,
}

#[derive(Parser, Debug)]
#[command(
    name = "mock-tracker",
    version,
    about = "In-memory stand-in for the tracker REST API"
)]
pub struct MockArgs {
    #[arg(long, default_value = DEFAULT_BIND, help = "Address to listen on")]
    pub bind: String,
    #[arg(long, help = "TOML file replacing the built-in fixture data")]
    pub seed: Option<PathBuf>,
}

/// The single JSON document to print and the process exit code.
#[derive(Debug)]
pub struct CommandOutput {
    pub document: Value,
    pub exit_code: u8,
}

impl CommandOutput {
    fn config_error(err: &ConfigError) -> Self {
        error!(error = %err, "invalid configuration");
        Self {
            document: json!({ "ok": false, "error": err.to_string() }),
            exit_code: CONFIG_ERROR_EXIT,
        }
    }
}

/// Resolve configuration through `lookup`, run every check and build the
/// report. Failed checks still exit 0; only configuration problems do not.
pub async fn run_verify(
    args: &VerifyArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CommandOutput> {
    let client = args.client.trim();
    if client.is_empty() {
        return Ok(CommandOutput::config_error(&ConfigError::BlankClient));
    }

    let config = match VerifyConfig::from_lookup(lookup) {
        Ok(config) => config,
        Err(e) => return Ok(CommandOutput::config_error(&e)),
    };

    let tracker = HttpTracker::new(&config.base_url, config.credentials.as_ref())?;
    let report = verify::run(&tracker, &config.settings, client).await;

    Ok(CommandOutput {
        document: serde_json::to_value(&report)?,
        exit_code: 0,
    })
}
