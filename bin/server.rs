// SSBG Dashboard - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use ssbg_dashboard::config::{init_tracing, DataArgs, ServeArgs};
use ssbg_dashboard::server::{serve, AppState};
use ssbg_dashboard::DataStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ssbg-server")]
#[command(about = "Interactive SSBG expenditure and recipient dashboard")]
#[command(version)]
struct Args {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // The dashboard cannot serve anything without its table
    let store = DataStore::load_with(&args.data.data_path, args.data.load_options())
        .with_context(|| format!("failed to load {}", args.data.data_path.display()))?;
    let (first, last) = store.year_bounds();
    info!(records = store.len(), first, last, "Dataset ready");

    let addr = args
        .serve
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", args.serve.host, args.serve.port))?;

    let state = AppState::new(store, args.serve.dashboard_config());
    serve(state, addr)
        .await
        .with_context(|| format!("server on {} failed", addr))?;

    Ok(())
}
