mod config;
mod db;
mod fetch;
mod parser;
mod pipeline;

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use tracing::{error, info};

use config::{Config, RunMode};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match try_main().await {
        Ok(()) => {
            info!("Ciao");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<()> {
    let t0 = Instant::now();
    info!("App Start");
    let config = Config::parse();

    info!("Setting Up DB Client");
    let store = db::DynamoStore::connect(&config.table)
        .await
        .context("creating db client")?;
    let source = fetch::HttpSource::new(&config.allowed_domain).context("creating http client")?;
    let opts = config.run_options();

    match RunMode::detect() {
        RunMode::Lambda => {
            info!("Registering Lambda handler (table {})", store.table());
            let (source, store, opts) = (&source, &store, &opts);
            lambda_runtime::run(service_fn(
                move |_event: LambdaEvent<serde_json::Value>| async move {
                    pipeline::run(source, store, opts)
                        .await
                        .map_err(lambda_runtime::Error::from)
                },
            ))
            .await
            .map_err(|e| anyhow!(e))?;
        }
        RunMode::Standalone => {
            let summary = pipeline::run(&source, &store, &opts).await?;
            info!(
                scraped = summary.scraped,
                written = summary.written,
                read = summary.read,
                missing = summary.missing,
                "Run Complete"
            );
        }
    }

    info!("{}", pipeline::took("Run", t0.elapsed().as_secs_f64()));
    Ok(())
}
