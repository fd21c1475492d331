//! RpcDesk - Main Entry Point
//!
//! Reads the configuration, installs logging and runs the console on
//! stdin/stdout until `quit` or end of input.

use rpcdesk::{AppConfig, Console, render_strip};
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Logs go to stderr so they never mix with console output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        config_dir = %config.config_dir.display(),
        "starting RpcDesk v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut console = Console::load(config.config_store()).await?;
    if let Err(error) = console.watch_config() {
        warn!(%error, "schema sources will not follow external edits");
    }

    let mut stdout = tokio::io::stdout();
    let banner = format!("{}\n", render_strip(console.tabs().state()));
    stdout.write_all(banner.as_bytes()).await?;
    stdout.flush().await?;

    console
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    info!("bye");
    Ok(())
}
