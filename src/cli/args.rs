//! CLI argument definitions using clap
//!
//! Commands:
//! - stpdb ingest <file>
//! - stpdb export <prefix> [--out <path>]
//! - stpdb publish <prefix> [--bucket <name>]
//! - stpdb fetch <bucket> <object> <out>
//! - stpdb get <key> / stpdb delete <key>
//! - stpdb list <bucket>
//!
//! Every command takes `--config <path>` (default `./stpdb.json`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stpdb - namespaced STEP record storage
#[derive(Parser, Debug)]
#[command(name = "stpdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a STEP file and store its records under the file's stem
    Ingest {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        /// STEP file to ingest
        file: PathBuf,
    },

    /// Rebuild a document from the store into a local file
    Export {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        /// Namespace to export
        prefix: String,

        /// Output file (default: <export_dir>/<prefix>.stp)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export a document as the next version in a bucket
    Publish {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        /// Namespace to publish
        prefix: String,

        /// Target bucket (default: derived from the prefix)
        #[arg(long)]
        bucket: Option<String>,
    },

    /// Download an object to a local file
    Fetch {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        bucket: String,
        object: String,
        out: PathBuf,
    },

    /// Print the stored definition for a key
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        /// Full storage key, e.g. `1000410-28L_742`
        key: String,
    },

    /// Remove a key from the store
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        key: String,
    },

    /// List the objects in a bucket
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./stpdb.json")]
        config: PathBuf,

        bucket: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
