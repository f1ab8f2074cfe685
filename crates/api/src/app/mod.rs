//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: user operations over the injected store
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router over a fresh in-memory store.
pub fn build_app(config: ApiConfig) -> anyhow::Result<Router> {
    build_app_with_services(config, AppServices::in_memory())
}

/// Build the full HTTP router over the given services.
pub fn build_app_with_services(config: ApiConfig, services: AppServices) -> anyhow::Result<Router> {
    if config.seed {
        let seeded = services.seed_demo()?;
        tracing::info!(seeded, "demo users seeded");
    }

    if config.dev_mode {
        tracing::warn!("development mode: health and documentation paths skip authentication");
    }

    let router = routes::router().layer(Extension(Arc::new(services)));
    Ok(middleware::apply_pipeline(router, Arc::new(config)))
}
