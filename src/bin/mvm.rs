//! The process-entry embedding application: parses a program image,
//! seeds one root process, and runs the scheduler to quiescence. This
//! is deliberately thin. It is not an assembler and does not accept
//! mnemonics, only raw integer words.

use std::process::ExitCode;

use clap::Parser;

use mvm::cli::Cli;
use mvm::io::{StdIn, StdOut};
use mvm::Vm;

/// A program image is plain text: signed decimal words separated by
/// whitespace. This is raw data, not assembly: no mnemonics, no
/// `<base>#` prefixes (those belong to the `SCAN` opcode's runtime input,
/// not to the image an embedder loads up front).
fn load_program(path: &std::path::Path) -> anyhow::Result<Vec<i32>> {
    let text = std::fs::read_to_string(path)?;
    text.split_whitespace()
        .map(|tok| tok.parse::<i32>().map_err(anyhow::Error::from))
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let program = match load_program(&cli.program) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("mvm: failed to read program: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut vm = Vm::new(StdIn::new(), StdOut::new());
    if let Err(e) = vm.spawn_process(program) {
        eprintln!("mvm: {}", e);
        return ExitCode::FAILURE;
    }

    match vm.exec() {
        Ok(()) => ExitCode::SUCCESS,
        Err(fatal) => {
            eprintln!("{}", fatal);
            ExitCode::FAILURE
        }
    }
}
