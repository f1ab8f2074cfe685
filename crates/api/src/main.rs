use anyhow::Context;

use users_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    users_observability::init();

    let config = ApiConfig::from_env()?;
    let bind_addr = config.bind_addr;
    tracing::info!(
        tokens = config.tokens.len(),
        dev_mode = config.dev_mode,
        "configuration loaded"
    );

    let app = users_api::app::build_app(config)?;

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
