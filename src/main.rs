mod capture;
mod config;
mod encode;
mod overlay;
mod roi;
mod server;
mod stream;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = config::Config::default();
    config.sanitize();
    config.validate()?;

    server::run(config).await
}
