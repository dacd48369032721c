//! Command-line driver for the Route53 record reconciliation engine
//!
//! Keeps one record set's state in a local JSON file and drives the
//! create / read / update / delete / import lifecycle against Route53.

mod cli;
mod commands;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use r53_record_core::{RecordService, ServiceContext};
use r53_record_provider::{AwsCredentials, ClientOptions, create_client};

use crate::cli::Cli;
use crate::state::{StateFile, load_settings};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // 日志输出到 stderr，stdout 只留给状态 JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    let settings = load_settings(global.settings.as_deref())?;

    let credentials = AwsCredentials::from_env().context("AWS credentials")?;
    let api = create_client(
        credentials,
        &ClientOptions {
            endpoint: global.endpoint,
            region: global.region,
            max_retries: global.max_retries,
        },
    )?;
    tracing::debug!("Using {} API client", api.id());

    let ctx = Arc::new(ServiceContext::new(api, settings));
    let svc = RecordService::new(ctx);
    let state = StateFile::new(global.state);

    commands::dispatch(cli.command, &svc, &state).await
}
