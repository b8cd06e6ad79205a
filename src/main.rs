use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repo_harvester::{
    HarvestConfig, HarvestSettings, Harvester, JsonFileSink, NpmsClient, TracingReporter,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("HARVESTER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("harvester.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = HarvestConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let client = NpmsClient::from_config(&config).context("Failed to build registry client")?;
    let sink = JsonFileSink::new(&config.output_path);
    let mut harvester = Harvester::new(client, TracingReporter, HarvestSettings::from(&config))
        .context("Invalid harvest settings")?;

    let outcome = harvester.run(&sink).await?;

    println!("Found {} repositories:", outcome.urls.len());
    for url in outcome.urls.iter() {
        println!("{url}");
    }

    Ok(())
}
