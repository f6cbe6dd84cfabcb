use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use upwatch_service::config::Config;
use upwatch_service::engine::Engine;
use upwatch_service::pool::build_pool;

#[derive(Parser, Debug)]
#[command(name = "upwatch-service", about = "Service health-monitoring engine")]
struct Cli {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the database path from the config file
    #[arg(short, long)]
    database: Option<String>,

    /// Run one manual sweep, print the counts, and exit
    #[arg(long)]
    refresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to load config: {:?}", e))?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    info!("{}", config);

    let pool = build_pool(&config.database.path).await?;
    let engine = Engine::new(&config, pool).await?;

    if cli.refresh {
        let summary = engine.scheduler().refresh_now().await?;
        println!("Services refreshed! Online: {} Offline: {}", summary.online, summary.offline);
        return Ok(());
    }

    engine.run().await
}
