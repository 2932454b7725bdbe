use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use smarthub::{
    client::ApiClient,
    config,
    web::{web_router, WebState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_web_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let client = ApiClient::from_config(&cfg).context("failed to build API client")?;
    info!("Using API at {}", client.base_url());

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    let app = web_router(WebState::new(client));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("smarthub-web listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(smarthub::shutdown_signal())
        .await?;

    info!("smarthub-web stopped");
    Ok(())
}
