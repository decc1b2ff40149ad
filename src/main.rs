//! webcanary - single-shot URL health-check invocations
//!
//! The binary runs exactly one invocation per execution; an external
//! scheduler (cron, a systemd timer, a serverless cron rule) provides
//! periodicity. The first argument selects the handler: `probe` (default)
//! or `persist`. The push-model persister reads its event JSON from stdin.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use webcanary::config::Config;
use webcanary::handler::ProbeHandler;
use webcanary::metrics::HttpMetricsBackend;
use webcanary::persist::{PullPersister, PushPersister, RedisRecordStore};
use webcanary::{CanaryError, PersistMode, Result};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging system
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = match std::env::var("CANARY_CONFIG") {
        Ok(path) => Config::from_file(path).await?,
        Err(_) => Config::from_env()?,
    };

    let mode = std::env::args().nth(1).unwrap_or_else(|| "probe".to_string());
    match mode.as_str() {
        "probe" => {
            let backend = Arc::new(HttpMetricsBackend::new(config.metrics.endpoint.as_str()));
            let handler = ProbeHandler::new(&config, backend)?;
            let report = handler.run().await;
            println!("{}", serde_json::to_string(&report)?);
        }
        "persist" => {
            let store = Arc::new(RedisRecordStore::connect(&config.persist.redis_url).await?);
            let result = match config.persist.mode {
                PersistMode::Push => {
                    let mut input = String::new();
                    tokio::io::stdin().read_to_string(&mut input).await?;
                    PushPersister::new(&config, store).persist_batch_raw(&input).await
                }
                PersistMode::Pull => {
                    let backend = Arc::new(HttpMetricsBackend::new(config.metrics.endpoint.as_str()));
                    PullPersister::new(&config, backend, store)
                        .persist_latest()
                        .await
                }
            };
            println!("{}", serde_json::to_string(&result)?);
        }
        other => {
            return Err(CanaryError::Config(format!(
                "Unknown mode {:?} (expected \"probe\" or \"persist\")",
                other
            )));
        }
    }

    Ok(())
}
