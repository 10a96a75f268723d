//! tea-dashboard: terminal back office for the tea factory.

use clap::Parser;
use tea_dashboard::app;
use tea_dashboard::cli::Cli;
use tea_factory_core::{Config, HttpBackend};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tea_dashboard=info,tea_factory_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    info!("backend {}", config.api_base_url);

    let backend = HttpBackend::new(&config)?;
    app::run(&cli, &config, &backend).await
}
