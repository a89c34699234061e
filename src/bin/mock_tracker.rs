use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tracker_verify::cli::MockArgs;
use tracker_verify::logging;
use tracker_verify::mock::{self, MockTracker};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let args = MockArgs::parse();

    let data = match &args.seed {
        Some(path) => mock::load_seed(path)?,
        None => mock::default_data(),
    };
    let tracker = MockTracker::new(data);

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(addr = %listener.local_addr()?, "mock tracker listening");

    axum::serve(listener, mock::router(tracker))
        .await
        .context("Mock tracker server failed")?;
    Ok(())
}
