//! Document export
//!
//! Reconstructs a STEP document from the store and delivers it to a
//! [`Sink`]: a local file, a bucket object, or any writer.
//!
//! Choosing versioned object names is not the exporter's job; it writes
//! exactly where it is told. [`publish_versioned`] layers the naming on
//! top.

mod errors;
mod exporter;
mod publish;
mod sink;

pub use errors::{ExportError, ExportResult};
pub use exporter::{ExportReport, PrefixExporter};
pub use publish::{publish_versioned, PublishReport};
pub use sink::Sink;
