//! Lifecycle events published while a batch runs.

use tracing::{info, warn};

use crate::outcome::{Failure, Outcome};

/// Identity of the test an event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEvent {
    pub test_id: String,
    /// Position of the test in its batch (0-based).
    pub index: usize,
}

/// Receiver of test lifecycle events.
///
/// For each test: `starting`, then `succeeded` or `failed` (neither for a
/// skipped test), then `finished` with the final outcome.
pub trait TestListener {
    fn starting(&mut self, _event: &TestEvent) {}

    fn succeeded(&mut self, _event: &TestEvent) {}

    fn failed(&mut self, _event: &TestEvent, _failure: &Failure) {}

    fn finished(&mut self, _event: &TestEvent, _outcome: &Outcome) {}
}

/// Emits one tracing line per finished test.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl TestListener for LoggingListener {
    fn failed(&mut self, event: &TestEvent, failure: &Failure) {
        warn!(test_id = %event.test_id, kind = ?failure.kind, "{failure}");
    }

    fn finished(&mut self, event: &TestEvent, outcome: &Outcome) {
        match outcome {
            Outcome::Skipped { reason } => info!(test_id = %event.test_id, %reason, "skipped"),
            other => info!(test_id = %event.test_id, outcome = other.label(), "finished"),
        }
    }
}
