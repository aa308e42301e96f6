mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use quill_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config_path = cli.config_path();
    let mut config = if cli.writes_default_config() {
        Config::load_from(&config_path)?
    } else {
        Config::read_from(&config_path)?
    };
    cli.apply_overrides(&mut config);

    match cli.command {
        cli::Commands::Serve { .. } => commands::serve::handle(&config).await,
        cli::Commands::Export { .. } => {
            commands::export::handle(&config, &config.export.csv_path).await
        }
        cli::Commands::Config(cmd) => commands::config::handle(cmd, &config, &config_path),
    }
}
