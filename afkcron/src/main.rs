mod cli;
mod daemon;

use afkcron_core::{CommandIdleSource, ConfigLoader, IdleSource};
use afkcron_logging::LogSink;
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let sink = match &cli.log {
        Some(path) => Some(
            LogSink::open(path)
                .with_context(|| format!("Error opening log file {}", path.display()))?,
        ),
        None => None,
    };
    afkcron_logging::init(sink)?;

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    for path in cli.config_paths() {
        loader.load_file(&path).await?;
    }

    if cli.check {
        println!("{}", serde_json::to_string_pretty(loader.entries())?);
        return Ok(());
    }

    let config = cli.daemon_config();
    let mut idle = CommandIdleSource::new(&config.idle_command)?;
    let probe = idle
        .idle_seconds()
        .await
        .context("Idle time source is not available")?;
    info!("Idle source '{}' ready ({}s idle)", config.idle_command, probe);

    let mut daemon = daemon::Daemon::new(loader.into_entries(), idle, config);
    daemon.run().await
}
