use std::{net::Ipv4Addr, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use orchestrator_api::{LocalBackends, init_tracing, orchestrator_app};
use orchestrator_config::{
    ConfigFile, OrchestratorConfig,
    constants::{DEFAULT_API_PORT, DEFAULT_DATA_DIR},
};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Load-test run orchestrator")]
struct Args {
    /// YAML config file; environment variables override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    port: Option<u16>,
    /// Directory receiving scenario blobs.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Args::parse();

    let file = match &cli.config {
        Some(path) => ConfigFile::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let config = OrchestratorConfig::resolve(&file, orchestrator_env::lookup)
        .context("invalid orchestrator configuration")?;

    let port = cli
        .port
        .or_else(orchestrator_env::orchestrator_port)
        .unwrap_or(DEFAULT_API_PORT);
    let data_dir = cli
        .data_dir
        .or_else(orchestrator_env::orchestrator_data_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let backends = LocalBackends::on_disk(file.region_infra, &data_dir);
    let app = orchestrator_app(Arc::new(backends.app_state(&config)));

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind orchestrator server on 0.0.0.0:{port}"))?;
    info!(
        port,
        data_dir = %data_dir.display(),
        pagination = %config.pagination,
        "orchestrator server listening"
    );

    axum::serve(listener, app)
        .await
        .context("orchestrator server terminated unexpectedly")?;

    Ok(())
}
