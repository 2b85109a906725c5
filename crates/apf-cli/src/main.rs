//! apf - package FPGA cores for the Analogue Pocket

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apf_cli::cmd;
use apf_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => cmd::check::check(&config),
        Commands::Build {
            config,
            cores,
            output,
            zip,
        } => cmd::build::build(&config, &cores, &output, zip),
        Commands::Info { config, cores } => cmd::info::info(&config, &cores),
    }
}
