use std::path::PathBuf;

use anyhow::Context;
use bridge_core::BridgeConfig;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::warn;
use url::Url;

/// Serve a Danbooru-style post API backed by a Szurubooru server.
#[derive(Debug, Parser)]
#[command(name = "booru-bridge", version, about)]
struct Cli {
    /// JSON config file.
    #[arg(long, env = "BRIDGE_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Override `bridgePort`.
    #[arg(long, env = "BRIDGE_PORT")]
    port: Option<u16>,

    /// Override `bridgeHostname`.
    #[arg(long, env = "BRIDGE_HOSTNAME")]
    hostname: Option<String>,

    /// Override `serverURL`.
    #[arg(long, env = "BRIDGE_SERVER_URL")]
    server_url: Option<Url>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = BridgeConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.bridge_port = port;
    }
    if let Some(hostname) = cli.hostname {
        config.bridge_hostname = hostname;
    }
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }

    let addr = format!("{}:{}", config.bridge_hostname, config.bridge_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    bridge_server::run(listener, config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await
}
