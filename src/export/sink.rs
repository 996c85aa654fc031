//! Export destinations

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::object_store::ObjectStore;

/// Where an export writes the reconstructed document.
pub enum Sink<'a> {
    /// A local file, replaced atomically once the export succeeds
    Local(PathBuf),
    /// A named object in a bucket, uploaded after the document is complete
    Object {
        store: &'a dyn ObjectStore,
        bucket: String,
        object: String,
    },
    /// Any writer; flushed but not closed
    Writer(&'a mut dyn Write),
}

impl<'a> Sink<'a> {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Sink::Local(path.into())
    }

    pub fn object(
        store: &'a dyn ObjectStore,
        bucket: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Sink::Object {
            store,
            bucket: bucket.into(),
            object: object.into(),
        }
    }

    pub fn writer(writer: &'a mut dyn Write) -> Self {
        Sink::Writer(writer)
    }

    /// Human-readable destination, used in logs and reports
    pub fn describe(&self) -> String {
        match self {
            Sink::Local(path) => path.display().to_string(),
            Sink::Object { bucket, object, .. } => format!("{}/{}", bucket, object),
            Sink::Writer(_) => "<writer>".to_string(),
        }
    }
}

impl fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sink").field(&self.describe()).finish()
    }
}
