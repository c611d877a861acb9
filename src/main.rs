//! depstash - dependency cache keying, restore and save
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use depstash::cli::commands::Settings;
use depstash::cli::{Cli, Commands};
use depstash::config::Config;
use depstash::error::StashResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StashResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("depstash=warn"),
        1 => EnvFilter::new("depstash=info"),
        _ => EnvFilter::new("depstash=debug"),
    };

    // Logs go to stderr; stdout carries the key / cache-hit outputs
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::load(cli.config.as_deref()).await?;
    let settings = Settings::resolve(&config, cli.work_dir, cli.state_file, cli.store_dir)?;

    match cli.command {
        Commands::Restore(args) => depstash::cli::commands::restore(args, &settings).await,
        Commands::Save(args) => depstash::cli::commands::save(args, &settings).await,
        Commands::Key(args) => depstash::cli::commands::key(args, &settings).await,
    }
}
