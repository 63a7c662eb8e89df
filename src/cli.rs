//! Command-line argument parsing for the `mvm` embedder binary.

use std::path::PathBuf;

use clap::Parser;

/// Load a program image and run it to quiescence.
#[derive(Parser, Debug)]
#[command(
    name = "mvm",
    version,
    about = "Run a program on the miniature cooperative stack VM"
)]
pub struct Cli {
    /// Path to a program image: whitespace-separated signed integers.
    pub program: PathBuf,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,
}
