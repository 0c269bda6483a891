//! Run reports: a listener that records every test and writes JSON.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeatureKey;
use crate::listener::{TestEvent, TestListener};
use crate::outcome::{Outcome, OutcomeKind};

/// One finished test as persisted in `report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub test_id: String,
    pub outcome: OutcomeKind,
    /// Failure message or skip reason.
    pub message: Option<String>,
    pub configuration_tip: Option<FeatureKey>,
    pub duration_ms: u64,
}

/// Persisted record of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn count(&self, outcome: OutcomeKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == outcome)
            .count()
    }
}

#[derive(Debug, Default)]
struct ReportState {
    report: RunReport,
    started: Option<Instant>,
}

/// Listener that builds a [`RunReport`].
///
/// Clones share the same report, so a caller keeps one handle and gives
/// another to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct ReportListener {
    state: Rc<RefCell<ReportState>>,
}

impl ReportListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the report so far.
    pub fn report(&self) -> RunReport {
        self.state.borrow().report.clone()
    }
}

impl TestListener for ReportListener {
    fn starting(&mut self, _event: &TestEvent) {
        let mut state = self.state.borrow_mut();
        if state.report.started_at.is_none() {
            state.report.started_at = Some(Utc::now().to_rfc3339());
        }
        state.started = Some(Instant::now());
    }

    fn finished(&mut self, event: &TestEvent, outcome: &Outcome) {
        let mut state = self.state.borrow_mut();
        let duration_ms = state
            .started
            .take()
            .map(|started| started.elapsed().as_millis() as u64)
            .unwrap_or_default();
        let (message, configuration_tip) = match outcome {
            Outcome::Succeeded => (None, None),
            Outcome::Failed(failure) => (Some(failure.message.clone()), failure.configuration_tip),
            Outcome::Skipped { reason } => (Some(reason.clone()), None),
        };
        state.report.entries.push(ReportEntry {
            test_id: event.test_id.clone(),
            outcome: outcome.kind(),
            message,
            configuration_tip,
            duration_ms,
        });
        state.report.finished_at = Some(Utc::now().to_rfc3339());
    }
}

/// Atomically write the report as pretty JSON (temp file + rename).
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    debug!(path = %path.display(), entries = report.entries.len(), "writing report");
    let mut buf = serde_json::to_string_pretty(report).context("serialize report")?;
    buf.push('\n');
    let parent = path
        .parent()
        .with_context(|| format!("report path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp report {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace report {}", path.display()))?;
    Ok(())
}

/// Load a report written by [`write_report`].
pub fn load_report(path: &Path) -> Result<RunReport> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read report {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse report {}", path.display()))
}
