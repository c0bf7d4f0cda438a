use anyhow::Result;
use clap::Parser;

use tilepop::cli::{Cli, Commands};
use tilepop::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Aggregate(args) => commands::aggregate(&cli, args),
        Commands::Merge(args) => commands::merge(&cli, args),
    }
}
