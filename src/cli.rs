// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One invocation deploys one stack from a template and a parameters file.

use clap::Parser;
use std::path::PathBuf;
use stackdeploy::types::{Region, StackName};

#[derive(Parser)]
#[command(name = "stackdeploy")]
#[command(about = "Create or update a CloudFormation stack and follow it to completion")]
#[command(version)]
pub struct Cli {
    /// Name of the stack to create or update
    pub stack_name: StackName,

    /// Template file
    pub template: PathBuf,

    /// Parameters file (JSON, or YAML with a .yml/.yaml extension)
    pub parameters: PathBuf,

    /// Region to deploy into (overrides the config file)
    #[arg(long)]
    pub region: Option<Region>,

    /// Configuration file (default: stackdeploy.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not stream stack events while waiting
    #[arg(long)]
    pub no_tail: bool,

    /// Only print the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
