#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

use anyhow::Result;
use clap::Parser;
use meshping_telemetry::{http, init, registry, Stats, TelemetryConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
struct MeshpingOpts {
    #[clap(long, env = "MESHPING_CONFIG", help = "Path to a meshping TOML config file")]
    config: Option<PathBuf>,
    #[clap(
        long,
        env = "HOSTNAME",
        help = "Reporting instance identity; overrides hostname in the config file"
    )]
    hostname: Option<String>,
    #[clap(
        long,
        env = "MESHPING_LISTEN_ADDR",
        help = "Overrides listen_addr in the config file"
    )]
    listen_addr: Option<SocketAddr>,
}

fn load_config(opts: MeshpingOpts) -> Result<TelemetryConfig> {
    let mut config = match (&opts.config, opts.hostname.as_deref()) {
        (Some(path), _) => TelemetryConfig::load(path)?,
        (None, Some(hostname)) => TelemetryConfig::new(hostname),
        (None, None) => {
            return Err(anyhow::anyhow!(
                "either --config or --hostname (HOSTNAME) must be set"
            ))
        }
    };
    if let Some(hostname) = opts.hostname {
        config.hostname = hostname;
    }
    if let Some(addr) = opts.listen_addr {
        config.listen_addr = addr;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(MeshpingOpts::parse())?;

    init::init_tracing(config.log_format)?;
    tracing::info!(
        target: "meshpingd",
        event = "startup",
        instance = %config.hostname,
        listen_addr = %config.listen_addr
    );

    // A registration failure leaves the metric set incomplete; refuse to start.
    let stats = Stats::new(config.hostname.clone())?;
    registry::register_process_collector(stats.registry())?;
    let stats = Arc::new(stats);

    http::run_server(config.listen_addr, stats).await?;
    Ok(())
}
