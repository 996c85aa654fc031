//! Observable events
//!
//! Every event the pipeline logs is named here so log consumers can rely
//! on a closed set of `event` values.

use std::fmt;

/// Observable events in stpdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    StoreOpened,
    StoreClosed,

    // Ingestion
    IngestBegin,
    BatchFlushed,
    IngestComplete,
    IngestFailed,
    IngestIncomplete,

    // Export
    ExportBegin,
    ExportComplete,
    ExportFailed,
    ExportIncomplete,

    // Object storage
    BucketCreated,
    BucketExists,
    ObjectUploaded,
    ObjectDownloaded,

    // Point operations
    KeyNotFound,
    KeyDeleted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreClosed => "STORE_CLOSED",

            Event::IngestBegin => "INGEST_BEGIN",
            Event::BatchFlushed => "BATCH_FLUSHED",
            Event::IngestComplete => "INGEST_COMPLETE",
            Event::IngestFailed => "INGEST_FAILED",
            Event::IngestIncomplete => "INGEST_INCOMPLETE",

            Event::ExportBegin => "EXPORT_BEGIN",
            Event::ExportComplete => "EXPORT_COMPLETE",
            Event::ExportFailed => "EXPORT_FAILED",
            Event::ExportIncomplete => "EXPORT_INCOMPLETE",

            Event::BucketCreated => "BUCKET_CREATED",
            Event::BucketExists => "BUCKET_EXISTS",
            Event::ObjectUploaded => "OBJECT_UPLOADED",
            Event::ObjectDownloaded => "OBJECT_DOWNLOADED",

            Event::KeyNotFound => "KEY_NOT_FOUND",
            Event::KeyDeleted => "KEY_DELETED",
        }
    }

    /// Failure events are logged at ERROR.
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::IngestFailed | Event::ExportFailed)
    }
}

/// Operations traced by an `ObservationScope`, each with its own
/// begin/complete/failed/incomplete events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ingest,
    Export,
}

impl Operation {
    pub fn begin(&self) -> Event {
        match self {
            Operation::Ingest => Event::IngestBegin,
            Operation::Export => Event::ExportBegin,
        }
    }

    pub fn complete(&self) -> Event {
        match self {
            Operation::Ingest => Event::IngestComplete,
            Operation::Export => Event::ExportComplete,
        }
    }

    pub fn failed(&self) -> Event {
        match self {
            Operation::Ingest => Event::IngestFailed,
            Operation::Export => Event::ExportFailed,
        }
    }

    pub fn incomplete(&self) -> Event {
        match self {
            Operation::Ingest => Event::IngestIncomplete,
            Operation::Export => Event::ExportIncomplete,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
