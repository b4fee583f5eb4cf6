use std::sync::Arc;

use anyhow::Context;

use lomartex_api::app::{self, services};
use lomartex_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lomartex_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = services::build_services(&config)
        .await
        .context("failed to initialize record stores")?;
    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
