//! ObservationScope for automatic begin/complete logging
//!
//! - Logs the operation's BEGIN event on creation
//! - Logs its COMPLETE event on `complete()`
//! - Logs its FAILED event (at ERROR) on `fail()`
//! - Logs its INCOMPLETE event (at WARN) if dropped without either

use std::cell::Cell;
use std::time::Instant;

use super::events::Operation;
use super::log_event_with_fields;
use super::logger::Logger;

/// A scope that logs the start and end of an operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields(Operation::Export, &[("prefix", "DOC")]);
/// // ... do work ...
/// scope.complete_with_fields(&[("records", "42")]);
/// ```
///
/// Fields given at creation are repeated on the closing event, along with
/// `elapsed_ms`.
pub struct ObservationScope<'a> {
    operation: Operation,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    pub fn new(operation: Operation) -> Self {
        Self::with_fields(operation, &[])
    }

    pub fn with_fields(operation: Operation, fields: &[(&'a str, &str)]) -> Self {
        log_event_with_fields(operation.begin(), fields);

        Self {
            operation,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed, adding `extra_fields` to the event
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_ms();

        let mut all_fields = self.field_refs();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));

        log_event_with_fields(self.operation.complete(), &all_fields);
    }

    /// Mark the scope as failed
    pub fn fail(self, reason: &str) {
        self.completed.set(true);

        let mut all_fields = self.field_refs();
        all_fields.push(("reason", reason));

        log_event_with_fields(self.operation.failed(), &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = self.operation.incomplete();
            Logger::warn(event.as_str(), &[("reason", "scope dropped without completion")]);
        }
    }
}

/// Wall-clock timer for `elapsed_ms` fields
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new(Operation::Ingest);
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields(Operation::Export, &[("prefix", "DOC")]);
        scope.complete_with_fields(&[("records", "2")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new(Operation::Ingest);
        scope.fail("disk full");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new(Operation::Ingest);
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
