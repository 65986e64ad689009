mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

use sg_cache::{CacheAside, CacheHandle};
use sg_core::config::Config;
use sg_core::GALLERY_CACHE_KEY;
use sg_upstream::MediaHostClient;

/// Load config from the optional file, then layer environment overrides.
fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    config
}

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path);

    // CLI flags win over file and environment.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting snapgrid");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    sg_server::start(config).await?;
    Ok(())
}

async fn fetch_gallery(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path);
    let client = MediaHostClient::new(&config.upstream);
    let snapshot = client
        .fetch()
        .await
        .context("Failed to fetch gallery from media host")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{} image(s)", snapshot.len());
    for image in &snapshot {
        println!("  {:<40} {}", image.title, image.display_url);
    }
    Ok(())
}

async fn clear_cache(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let cache = CacheHandle::from_config(&config.cache).await;
    let gate = CacheAside::new(cache, Arc::new(MediaHostClient::new(&config.upstream)));

    gate.clear(GALLERY_CACHE_KEY)
        .await
        .context("Failed to clear gallery cache")?;
    println!("Cache cleared");
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Invalid config file: {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration is valid");
    } else {
        println!("Configuration is valid with {} warning(s):", warnings.len());
        for warning in warnings {
            println!("  - {warning}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine.
    dotenv::dotenv().ok();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "snapgrid=trace,sg_server=trace,sg_cache=trace,sg_upstream=debug,sg_core=debug,tower_http=debug".to_string()
        } else {
            "snapgrid=info,sg_server=info,sg_cache=info,sg_upstream=info,sg_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config_path))
        }
        Commands::Fetch { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(fetch_gallery(config_path, json))
        }
        Commands::ClearCache => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(clear_cache(config_path))
        }
        Commands::Validate { config } => {
            let path = config.or_else(|| cli.config.clone());
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("snapgrid {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
