mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;
mod workspace;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use shifa_proto::client::CatalogClient;
use shifa_proto::config::Config;
use shifa_proto::directory::Directory;
use shifa_proto::pagination::Pager;

#[derive(Parser, Debug)]
#[command(name = "shifa")]
#[command(about = "Browse the Moroccan medicine catalog and find pharmacies", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog service base url (overrides config and SHIFA_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Records per catalog page
    #[arg(long)]
    page_size: Option<usize>,

    /// Pharmacy/medicine directory file (TOML)
    #[arg(long, value_name = "PATH")]
    directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = shifa_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("shifa.log");
    let ui_state_path = data_dir.join("ui_state.json");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("shifa log: {}", log_path.display());
    tracing::info!("shifa starting…");

    // ── Load config: file, then env, then flags ──────────────────────────────
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("{}; using defaults", e);
        Config::default()
    });
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(size) = cli.page_size {
        config.catalog.page_size = size;
    }
    if let Some(path) = cli.directory {
        config.paths.directory_toml = path;
    }
    config.validate()?;

    let directory = Directory::load(&config.paths.directory_toml).with_context(|| {
        format!(
            "loading pharmacy directory {}",
            config.paths.directory_toml.display()
        )
    })?;
    tracing::info!(
        "directory: {} medicines, {} pharmacies",
        directory.medicines.len(),
        directory.pharmacies.len()
    );

    let client = CatalogClient::new(&config.api)?;
    let endpoint = client.endpoint().to_string();
    tracing::info!("catalog endpoint {}", endpoint);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(
        Arc::new(client),
        directory,
        Pager::new(config.catalog.page_size),
        endpoint,
        ui_state_path,
    );
    app.run().await?;

    Ok(())
}
