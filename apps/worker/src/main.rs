use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use checkup_worker::config::Config;
use checkup_worker::monitoring::{HttpChecker, MonitoringExecutor, MonitoringScheduler};
use checkup_worker::notify::build_notifier;
use checkup_worker::store::FileStore;

#[derive(Debug, Parser)]
#[command(version, about = "Probes stored HTTP/HTTPS checks and alerts owners on state changes")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/checkup/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the worker (default)
    Run {
        /// Run a single tick, wait for every check, then exit
        #[arg(long)]
        once: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Run { once: false }) {
        Command::Config => {
            print!("{config}");
            Ok(())
        }
        Command::Run { once } => {
            logger::init(&config.logging.level, config.logging.format);
            run(config, once).await
        }
    }
}

async fn run(config: Config, once: bool) -> Result<()> {
    let store = FileStore::open(&config.store.data_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", config.store.data_dir.display()))?;
    let checker = HttpChecker::new().context("Failed to build HTTP client")?;
    let notifier = build_notifier(&config.notifier)?;

    let executor = Arc::new(MonitoringExecutor::new(
        Arc::new(store),
        Arc::new(checker),
        notifier,
        config.worker.collection.clone(),
    ));
    let scheduler = MonitoringScheduler::new(executor, config.worker.interval());

    if once {
        let summary = scheduler.run_once().await;
        info!("Tick finished: {}", summary);
        return Ok(());
    }

    info!(
        "Worker started: checking '{}' in {} every {}s",
        config.worker.collection,
        config.store.data_dir.display(),
        scheduler.interval().as_secs()
    );

    scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
