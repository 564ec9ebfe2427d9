#![allow(missing_docs)]
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{info, warn};

use rewards_rpc::{ServerConfig, run};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let AppArgs { host, port, config } = AppArgs::parse().context("parsing arguments")?;
    let addr = SocketAddr::from((host, port));
    run(addr, config).await?;

    info!("Bye!");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    host: IpAddr,
    port: u16,
    config: ServerConfig,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let host = pargs
            .opt_value_from_str(["-h", "--host"])
            .context("parsing host argument")?;

        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;

        let server_key = pargs
            .opt_value_from_str("--server-key")
            .context("parsing server key argument")?;

        let http_key = pargs
            .opt_value_from_str("--http-key")
            .context("parsing http key argument")?;

        let defaults = ServerConfig::default();
        let result = Self {
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: port.unwrap_or(7350),
            config: ServerConfig {
                server_key: server_key.unwrap_or(defaults.server_key),
                http_key: http_key.unwrap_or(defaults.http_key),
                ..defaults
            },
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}
