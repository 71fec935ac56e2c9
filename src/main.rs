// ABOUTME: Entry point for the stackdeploy CLI application.
// ABOUTME: Parses arguments, loads configuration and runs the deploy command.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use stackdeploy::config::Config;
use stackdeploy::error::Result;
use stackdeploy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    // CLI flags win over the config file
    if let Some(region) = cli.region {
        config.region = region;
    }
    if cli.no_tail {
        config.tail.enabled = false;
    }

    commands::deploy(
        cli.stack_name,
        &cli.template,
        &cli.parameters,
        config,
        output,
    )
    .await
}
