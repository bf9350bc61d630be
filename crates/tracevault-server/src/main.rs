use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracevault_config::CollectorConfig;

/// Multi-protocol distributed-tracing span collector
#[derive(Parser)]
#[command(name = "tracevault")]
#[command(version)]
#[command(about = "Multi-protocol distributed-tracing span collector", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Enable the Zipkin receiver on this host:port
    #[arg(long, value_name = "HOST:PORT")]
    zipkin_host_port: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config = if let Some(config_path) = &cli.config {
        CollectorConfig::load_from_path(config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?
    } else {
        CollectorConfig::load_or_default().context("failed to load configuration")?
    };

    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(host_port) = &cli.zipkin_host_port {
        config.zipkin.host_port = host_port.clone();
    }
    config.validate()?;

    tracevault_server::run_with_config(config).await
}
