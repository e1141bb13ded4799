//! CLI Module
//!
//! Command-line interface for floatwavio.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// floatwavio - inspect and re-encode WAV files
#[derive(Parser, Debug)]
#[command(name = "floatwavio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print format and statistics of WAV files
    #[command(name = "info")]
    Info {
        /// WAV files, or directories to search for .wav files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit one JSON object per file
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a WAV file with a different sample encoding
    #[command(name = "convert")]
    Convert {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Target bits per sample (8, 16, 24 or 32); defaults to the input's
        #[arg(short, long)]
        bits: Option<u16>,

        /// Write 32-bit IEEE float samples
        #[arg(short, long)]
        float: bool,
    },
}
