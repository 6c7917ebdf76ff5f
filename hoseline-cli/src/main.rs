//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use hoseline_cli::CliError;

fn main() {
    match hoseline_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("hoseline: {err}");
            std::process::exit(1);
        }
    }
}
