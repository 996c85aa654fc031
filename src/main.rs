//! stpdb CLI entry point
//!
//! Parses arguments, dispatches through `cli::run`, prints any error to
//! stderr and exits non-zero. Everything else lives in the CLI module.

use stpdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
