use anyhow::Result;
use safepath::{SafePathConfig, web};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing(config: &SafePathConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SafePathConfig::load()?;
    init_tracing(&config);

    tracing::info!("Starting SafePath {}", safepath::VERSION);
    web::run(config).await
}
