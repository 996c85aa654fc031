//! CLI module for stpdb
//!
//! Provides the command-line interface for:
//! - ingest: parse a STEP file into the store
//! - export: rebuild a document into a local file
//! - publish: rebuild a document as a versioned bucket object
//! - fetch / list: read back from the object store
//! - get / delete: point operations on stored keys

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{delete, export, fetch, get, ingest, list, load_config, publish, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
