//! catalogd server binary.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use catalogd::config::Config;
use catalogd::{logging, server, signal, Catalog, ItemStore};
use clap::Parser;

#[derive(Parser)]
#[command(name = "catalogd")]
#[command(about = "Catalog API over a flat JSON item store")]
struct Args {
    /// Path to configuration file
    config: Option<PathBuf>,

    /// Override the item store path from the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::default_toml());
        return;
    }

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(data) = args.data {
        config.store.path = data;
    }

    // Initialize logging first
    logging::init(&config.logging);

    if let Err(e) = run(config) {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = signal::install_signal_handler()?;

    let store = if config.store.create_if_missing {
        ItemStore::open_or_create(&config.store.path)?
    } else {
        ItemStore::open(&config.store.path)?
    };
    tracing::info!(path = %store.path().display(), "Opened item store");

    let catalog = Arc::new(Catalog::new(store));
    let handle = server::start(&config.http, Arc::clone(&catalog))?;

    wait_for_shutdown(&shutdown);

    handle.shutdown();
    tracing::info!(cache = %catalog.cache_metrics(), "Shutdown complete");
    Ok(())
}

fn wait_for_shutdown(shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(100));
    }
}
