// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) and parse command-line arguments
// 2. Dispatch to the subcommand handler
// 3. Print progress lines and errors as they arrive
// 4. Exit with proper code (0 = all good, 1 = missing dogs or failed
//    downloads, 2 = the run could not start)
// =============================================================================

mod cli; // src/cli.rs - command-line argument definitions

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pet_spotlight::{run_dog_downloads, run_get_fosters, Config, Error};
use std::path::PathBuf;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "pet_spotlight=info"
    } else {
        "pet_spotlight=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = cli.site.to_config();

    match cli.command {
        Commands::Download { names, output } => handle_download(names, output, config).await,
        Commands::Fosters { json } => handle_fosters(json, config).await,
    }
}

// Prints every error as it arrives and returns how many there were
fn print_errors(mut errors: UnboundedReceiver<Error>) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut count = 0;
        while let Some(error) = errors.recv().await {
            eprintln!("❌ {}", error);
            count += 1;
        }
        count
    })
}

async fn handle_download(names: String, output: PathBuf, config: Config) -> Result<i32> {
    println!("🔍 Looking for: {}", names);
    println!("📁 Saving to: {}", output.display());

    let (progress_tx, mut progress_rx) = unbounded_channel();
    let (errors_tx, errors_rx) = unbounded_channel();
    let errors = print_errors(errors_rx);

    let run = tokio::spawn(async move {
        run_dog_downloads(&names, &output, &config, progress_tx, errors_tx).await
    });

    // Ends when the run drops its progress sender
    while let Some(line) = progress_rx.recv().await {
        println!("{}", line);
    }

    let summary = run
        .await
        .context("download task panicked")?
        .context("could not start the download")?;
    let error_count = errors.await.context("error printer panicked")?;

    if error_count > 0 {
        println!("⚠️  {} item(s) failed, see above", error_count);
    }

    if summary.missing.is_empty() && error_count == 0 {
        Ok(0)
    } else {
        Ok(1)
    }
}

async fn handle_fosters(json: bool, config: Config) -> Result<i32> {
    let (errors_tx, errors_rx) = unbounded_channel();
    let errors = print_errors(errors_rx);

    let mut fosters = run_get_fosters(&config, errors_tx)
        .await
        .context("could not look up fosters")?;
    fosters.sort();
    let error_count = errors.await.context("error printer panicked")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fosters)?);
    } else if fosters.is_empty() {
        println!("No dogs are looking for a foster right now");
    } else {
        println!("🏠 {} dog(s) can be fostered:", fosters.len());
        for name in &fosters {
            println!("   {}", name);
        }
    }

    Ok(if error_count > 0 { 1 } else { 0 })
}
