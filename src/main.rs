// Copyright 2026 Filmstat Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use filmstat::fetch::HttpClient;
use filmstat::rest::{self, AppState};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "filmstat",
    about = "Filmstat — scrape a box-office table and answer four fixed questions over HTTP",
    version
)]
struct Cli {
    /// Port for the HTTP API
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "filmstat=debug"
    } else {
        "filmstat=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    info!("starting filmstat v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState {
        http: HttpClient::new(),
    });
    rest::start(&cli.bind, cli.port, state).await
}
