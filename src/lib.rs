//! SmartHub order management
//!
//! Two tiers live in this crate:
//! - the API service: CRUD over orders and order lines under `/api`
//! - the front end: [`client::ApiClient`] plus the server-rendered pages in [`web`]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// API service
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod repositories;
pub mod tracing;

// Front end
pub mod client;
pub mod web;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        Self { db, config }
    }
}

/// Resource routes, nested under `/api` by [`app_router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/Order", handlers::order_routes())
        .nest("/OrderLine", handlers::order_line_routes())
}

/// CORS policy derived from configuration.
///
/// Explicit origins win; otherwise development runs permissive and every
/// other environment allows no cross-origin callers.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full API application: health probes, resource routes and the middleware stack.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .nest("/health", health::health_routes())
        .nest("/api", api_routes())
        .layer(crate::tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM; used for graceful shutdown by both binaries.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                ::tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    ::tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, origins: Option<&str>) -> config::AppConfig {
        let mut cfg = config::AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            environment.into(),
        );
        cfg.cors_allowed_origins = origins.map(str::to_string);
        cfg
    }

    #[test]
    fn cors_layer_builds_for_every_environment() {
        // Construction must not panic on malformed origins either.
        let _ = cors_layer(&config("development", None));
        let _ = cors_layer(&config("production", None));
        let _ = cors_layer(&config("production", Some("https://a.example, bad\nvalue")));
    }
}
