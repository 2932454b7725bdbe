use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing::{error, info};

use smarthub as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    if cfg.cors_origins().is_empty() && cfg.is_development() {
        info!("Using permissive CORS because explicit origins were not configured (development environment)");
    }

    let app_state = api::AppState::new(Arc::new(db_pool), cfg.clone());
    let app = api::app_router(app_state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("smarthub-api listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(api::shutdown_signal())
        .await?;

    info!("smarthub-api stopped");
    Ok(())
}
