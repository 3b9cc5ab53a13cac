use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::error;
use tracing_subscriber::EnvFilter;

use logscour::config::Config;
use logscour::discover::DiscoveryEngine;
use logscour::fetch::{fetch, local_name};
use logscour::model::Credentials;
use logscour::scan::Scanner;
use logscour::search::SearchCoordinator;
use logscour::store::{LocalStore, RemoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml|json>", args[0]);
        std::process::exit(1);
    }
    let config = Config::load_from_path(Path::new(&args[1]))
        .with_context(|| format!("failed to load config {}", args[1]))?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let share = prompt(&mut input, "Enter share name: ")?;
    let username = prompt(&mut input, "Enter username: ")?;
    let password = prompt(&mut input, "Enter password: ")?;
    let needle = prompt(&mut input, "Enter search string: ")?;

    println!(
        "Attempting to connect to share {} on {}",
        share, config.server
    );

    let credentials = Credentials { username, password };
    let address = PathBuf::from(&config.server).join(&share);
    let store: Arc<dyn RemoteStore> = match LocalStore::connect(&address, &credentials).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("failed to connect: {}", e);
            std::process::exit(1);
        }
    };
    println!("Connection established.");

    println!("\nInitiating parallel file discovery...");
    let engine = DiscoveryEngine::new(&config.file_suffix);
    let candidates = engine.discover(store.clone(), &config.search_roots()).await;

    if candidates.is_empty() {
        println!("\nNo log files found.");
        return Ok(());
    }

    println!(
        "\nTotal {} log files discovered. Searching for '{}'...",
        candidates.len(),
        needle
    );

    let coordinator = SearchCoordinator::new(
        Scanner::new(config.buffer_size),
        config.max_concurrent_scans,
        config.scan_timeout_ms.map(Duration::from_millis),
    );
    let outcome = coordinator.run(store.clone(), candidates, &needle).await;

    if outcome.matches.is_empty() {
        println!("\nNo matches for '{}'.", needle);
        return Ok(());
    }

    println!("\n--- Search Complete ---");
    println!("Total scanned: {}", outcome.discovered);
    println!("Matched files:");
    for path in &outcome.matches {
        println!("- {}", path);
    }

    let to_fetch = prompt(&mut input, "\nEnter file path to fetch (or press Enter to skip): ")?;
    if to_fetch.is_empty() {
        println!("Fetch skipped.");
        return Ok(());
    }

    let dest = local_name(&to_fetch).to_string();
    println!("Fetching '{}' to '{}'...", to_fetch, dest);
    match fetch(store.as_ref(), &to_fetch, Path::new(&dest)).await {
        Ok(bytes) => println!("Fetched {} bytes to '{}'.", bytes, dest),
        Err(e) => error!("failed to fetch: {}", e),
    }

    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
