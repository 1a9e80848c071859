use std::sync::Arc;

use clap::{Parser, Subcommand};
use panoptes::{
    config::{AppConfig, ConfigLoader},
    models::channel::ChannelConfig,
    sampling::HttpOccupancyReader,
    supervisor::Supervisor,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration directory.
    #[arg(long)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the occupancy monitoring supervisor.
    Run,
    /// Loads and validates all configuration without entering the sampling
    /// loop.
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_supervisor(cli.config_dir.as_deref()).await?,
        Commands::Validate => validate(cli.config_dir.as_deref())?,
    }

    Ok(())
}

/// Loads the application and channel configuration; any failure here is
/// startup-fatal.
fn load_configuration(
    config_dir: Option<&str>,
) -> Result<(AppConfig, Vec<ChannelConfig>), Box<dyn std::error::Error>> {
    let config = AppConfig::new(config_dir)?;
    let channels =
        ConfigLoader::new(config.channel_config_path.clone()).load_all::<ChannelConfig>()?;
    Ok((config, channels))
}

async fn run_supervisor(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let (config, channels) = load_configuration(config_dir)?;
    tracing::debug!(
        threshold = config.threshold,
        sources = config.sources.len(),
        channels = channels.len(),
        "Configuration loaded."
    );

    let reader = HttpOccupancyReader::new(reqwest::Client::new());

    let supervisor = Supervisor::builder()
        .config(config)
        .reader(Arc::new(reader))
        .channels(channels)
        .build()?;

    tracing::info!("Supervisor initialized, starting monitoring...");

    supervisor.run().await?;

    Ok(())
}

fn validate(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, channels) = load_configuration(config_dir)?;
    println!(
        "Configuration OK: {} source(s), {} channel(s).",
        config.sources.len(),
        channels.len()
    );
    Ok(())
}
