mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};
use commands::{inspect, seed};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    logging::init(cli.verbose);
    match &cli.command {
        Commands::Seed(args) => seed::run(&cli, args),
        Commands::Inspect(args) => inspect::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
