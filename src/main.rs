//! Findash main entry point

use anyhow::anyhow;
use clap::Parser;
use findash_api::start_server;
use findash_config::Config;
use findash_core::{Dashboard, JsonFileSource, SampleSource, SourceRef};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "findash")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight financial reporting dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Dataset JSON file (overrides data.path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Config file when present, defaults otherwise
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        Config::load(args.config.clone()).map_err(|e| anyhow!("{}", e.to_details()))?
    } else {
        Config::default()
    };

    if let Some(data) = &args.data {
        config.data.path = Some(data.clone());
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().map_err(|e| anyhow!("{}", e.to_details()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if args.config.exists() {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::info!("No config file at {}, using defaults", args.config.display());
    }

    let source: SourceRef = match &config.data.path {
        Some(path) => Arc::new(JsonFileSource::new(path)),
        None => Arc::new(SampleSource),
    };

    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut dashboard = Dashboard::new(source);
        if let Err(e) = dashboard.load().await {
            return Err(anyhow!(
                "Failed to load dataset from {}\n{}",
                dashboard.source_description(),
                e.to_details()
            ));
        }

        start_server(config, Arc::new(RwLock::new(dashboard))).await
    })
}
