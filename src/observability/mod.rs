//! Observability for stpdb
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Scope-based begin/complete/failed tracing
//!
//! Observability is read-only: a failure to write a log line never fails
//! the operation being logged.
//!
//! ```ignore
//! use stpdb::observability::{log_event_with_fields, Event, ObservationScope, Operation};
//!
//! log_event_with_fields(Event::BucketCreated, &[("bucket", "1000410-28l")]);
//!
//! let scope = ObservationScope::with_fields(Operation::Ingest, &[("namespace", "DOC")]);
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::{Event, Operation};
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event with fields. Failure events go out at ERROR.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

/// Log a per-entry event at TRACE
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}

fn severity_for(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    }
}
