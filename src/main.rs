use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use tracker_verify::cli::{self, VerifyArgs};
use tracker_verify::logging;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init_tracing();
    let args = VerifyArgs::parse();

    let output = cli::run_verify(&args, |key| std::env::var(key).ok()).await?;
    println!("{}", serde_json::to_string(&output.document)?);

    Ok(ExitCode::from(output.exit_code))
}
