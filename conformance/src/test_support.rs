//! Test-only factories and listeners.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::capability::{Citation, Factory};
use crate::listener::{TestEvent, TestListener};
use crate::outcome::{Failure, Outcome};

/// Factory with a name and an optional authority, and nothing else.
#[derive(Debug, Clone)]
pub struct StubFactory {
    name: String,
    authority: Option<Citation>,
}

impl StubFactory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            authority: None,
        }
    }

    pub fn with_authority(mut self, authority: Citation) -> Self {
        self.authority = Some(authority);
        self
    }
}

impl Factory for StubFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn authority(&self) -> Option<&Citation> {
        self.authority.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Listener that records every event as a compact string, e.g. `failed:case-2`.
///
/// Clones share the same log, so a test can keep one handle while the
/// orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    log: Rc<RefCell<Vec<String>>>,
    failures: Rc<RefCell<Vec<(String, Failure)>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn failures(&self) -> Vec<(String, Failure)> {
        self.failures.borrow().clone()
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl TestListener for RecordingListener {
    fn starting(&mut self, event: &TestEvent) {
        self.push(format!("starting:{}", event.test_id));
    }

    fn succeeded(&mut self, event: &TestEvent) {
        self.push(format!("succeeded:{}", event.test_id));
    }

    fn failed(&mut self, event: &TestEvent, failure: &Failure) {
        self.push(format!("failed:{}", event.test_id));
        self.failures
            .borrow_mut()
            .push((event.test_id.clone(), failure.clone()));
    }

    fn finished(&mut self, event: &TestEvent, outcome: &Outcome) {
        self.push(format!("finished:{}:{}", event.test_id, outcome.label()));
    }
}
