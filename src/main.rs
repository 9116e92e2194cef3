use anyhow::{anyhow, Result};
use nim_proxy::logger;
use nim_proxy::proxy::{AxumServer, ProxyConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = ProxyConfig::from_env();

    let (server, handle) = AxumServer::start(config).await.map_err(|e| anyhow!(e))?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    server.stop();
    handle.await?;

    Ok(())
}
