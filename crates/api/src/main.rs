use anyhow::Context;

use tenantry_api::app::{AppOptions, build_app};
use tenantry_infra::{BackendCell, BackendConfig};

static BACKEND: BackendCell = BackendCell::const_new();

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tenantry_observability::init();

    let config = BackendConfig::from_env().context("invalid backend configuration")?;
    let backend = BACKEND
        .get_or_connect(&config)
        .await
        .context("failed to initialize backend")?;

    let app = build_app(
        backend,
        AppOptions {
            request_timeout: config.request_timeout,
        },
    );

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
