//! floatwavio CLI
//!
//! Command-line interface for reading, inspecting and re-encoding WAV files.

use clap::Parser;
use env_logger::Env;
use log::debug;

use floatwavio::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("floatwavio v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Info { paths, json } => commands::info(&paths, json),
        Commands::Convert {
            input,
            output,
            bits,
            float,
        } => commands::convert(&input, &output, bits, float),
    }
}
