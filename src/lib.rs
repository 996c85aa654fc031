//! stpdb - namespaced STEP record storage
//!
//! Ingests STEP exchange files record by record into an ordered key-value
//! store, keyed `<namespace>_<id>`, and rebuilds documents from a
//! namespace prefix into local files or versioned bucket objects.

pub mod cli;
pub mod export;
pub mod ingest;
pub mod object_store;
pub mod observability;
pub mod parser;
pub mod store;
