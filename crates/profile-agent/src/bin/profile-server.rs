//! Proxy server exposing profile generation and chat over HTTP

use anyhow::Context;
use clap::Parser;
use profile_agent::{GatewayMode, ProfileConfig};
use profile_agent::server::{self, AppState};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "profile-server")]
#[command(about = "Proxy holding the model API key for profile-agent clients", long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    agent_utils::init_tracing();

    let args = Args::parse();

    // The server always talks to the model itself; a missing key yields 503s.
    let mut builder = ProfileConfig::builder().gateway_mode(GatewayMode::Proxy);
    if let Some(port) = args.port {
        builder = builder.server_port(port);
    }
    let config = builder
        .with_env()?
        .build()
        .context("Invalid configuration")?;

    let addr = SocketAddr::new(args.host, config.server_port);
    info!(model = %config.model, "Starting profile-server");

    let state = AppState::from_config(config)?;
    server::serve(addr, state)
        .await
        .with_context(|| format!("Server on {addr} failed"))?;

    Ok(())
}
