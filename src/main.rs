//! Roster server binary
//!
//! Usage: `roster [config.yaml]`. The configuration path may also come from
//! `ROSTER_CONFIG`; without either, defaults are used.

use anyhow::Result;
use roster::config::AppConfig;
use roster::server::ServerBuilder;
use roster::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "ROSTER_CONFIG";

fn load_config() -> Result<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => Ok(AppConfig::from_yaml_file(&path)?),
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        address = %config.server.address(),
        default_page_size = config.paging.default_page_size,
        max_page_size = config.paging.max_page_size,
        "starting roster"
    );

    ServerBuilder::new()
        .with_config(config)
        .with_repository(InMemoryStore::with_seed_data())
        .serve(None)
        .await
}
