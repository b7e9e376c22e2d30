use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, SharedOrchestrator};
use crate::app::Orchestrator;
use crate::config::SafePathConfig;
use crate::shell::{self, ShellCache};

/// API under `/api`, the application shell for everything else
pub fn app(
    orchestrator: SharedOrchestrator,
    shell: Arc<ShellCache>,
    config: &SafePathConfig,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(orchestrator))
        .fallback_service(shell::router(shell))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: SafePathConfig) -> Result<()> {
    let orchestrator = Orchestrator::from_config(&config)?;
    let shell = ShellCache::from_config(&config).await;
    let app = app(
        Arc::new(orchestrator),
        Arc::new(shell),
        &config,
    );

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);
    axum::serve(listener, app)
        .await
        .context("Web server stopped unexpectedly")
}
