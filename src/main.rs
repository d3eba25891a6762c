// irisweb - main.rs
// Loads config, installs logging, then hands off to the CLI dispatcher.

use clap::Parser;
use irisweb::cli::{dispatch, Cli};
use irisweb::config::config_file;
use irisweb::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_tracing(config.debug);
    let file = config_file(cli.config.as_deref());
    if file.is_file() {
        tracing::info!("Loaded config from {}", file.display());
    } else {
        tracing::info!(
            "No config file at {}, using defaults and IRIS_* environment",
            file.display()
        );
    }
    tracing::debug!("Resolved config: {config:?}");

    if let Err(e) = dispatch(cli, config).await {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
