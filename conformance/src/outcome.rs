//! Test outcomes, failures and the per-test state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FeatureKey;

/// Error returned by a test body.
#[derive(Debug)]
pub enum TestFailure {
    /// A verified value did not match the expected one.
    Assertion(String),
    /// The implementation does not support what the test needs; the test is skipped.
    Unsupported(String),
    /// Anything else raised by the body.
    Unexpected(anyhow::Error),
}

impl TestFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        TestFailure::Assertion(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        TestFailure::Unsupported(message.into())
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFailure::Assertion(message) => write!(f, "assertion failed: {message}"),
            TestFailure::Unsupported(message) => write!(f, "unsupported: {message}"),
            TestFailure::Unexpected(err) => write!(f, "unexpected failure: {err:#}"),
        }
    }
}

impl From<anyhow::Error> for TestFailure {
    fn from(err: anyhow::Error) -> Self {
        TestFailure::Unexpected(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Unexpected,
}

/// A reported test failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Optional feature whose check was running when the failure occurred.
    pub configuration_tip: Option<FeatureKey>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(key) = self.configuration_tip {
            write!(f, " (tip: {})", key.tip())?;
        }
        Ok(())
    }
}

/// Final outcome of one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(Failure),
    Skipped { reason: String },
}

/// Persisted classification of an [`Outcome`], without its payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Succeeded,
    Failed,
    Skipped,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Succeeded => "succeeded",
            OutcomeKind::Failed => "failed",
            OutcomeKind::Skipped => "skipped",
        }
    }
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Succeeded => OutcomeKind::Succeeded,
            Outcome::Failed(_) => OutcomeKind::Failed,
            Outcome::Skipped { .. } => OutcomeKind::Skipped,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn state(&self) -> TestState {
        match self {
            Outcome::Succeeded => TestState::Succeeded,
            Outcome::Failed(_) => TestState::Failed,
            Outcome::Skipped { .. } => TestState::Skipped,
        }
    }
}

/// What one test invocation hands back to the orchestrator.
///
/// The tip is the feature of the optional section that failed, if any; it
/// is only meaningful when the outcome is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub outcome: Outcome,
    pub tip: Option<FeatureKey>,
}

impl Invocation {
    /// Classify a body result, attaching `tip` to failures.
    pub fn from_result(result: Result<(), TestFailure>, tip: Option<FeatureKey>) -> Self {
        let outcome = match result {
            Ok(()) => Outcome::Succeeded,
            Err(TestFailure::Unsupported(reason)) => Outcome::Skipped {
                reason: format!("unsupported: {reason}"),
            },
            Err(TestFailure::Assertion(message)) => Outcome::Failed(Failure {
                kind: FailureKind::Assertion,
                message,
                configuration_tip: tip,
            }),
            Err(TestFailure::Unexpected(err)) => Outcome::Failed(Failure {
                kind: FailureKind::Unexpected,
                message: format!("{err:#}"),
                configuration_tip: tip,
            }),
        };
        Self { outcome, tip }
    }
}

/// Lifecycle of a single test execution.
///
/// `Pending → Running → {Succeeded, Failed, Skipped} → Finished`. A test
/// whose capabilities are missing goes straight from `Pending` to `Skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
    Finished,
}

impl TestState {
    pub fn can_advance_to(self, next: TestState) -> bool {
        use TestState::{Failed, Finished, Pending, Running, Skipped, Succeeded};
        matches!(
            (self, next),
            (Pending, Running)
                | (Pending, Skipped)
                | (Running, Succeeded | Failed | Skipped)
                | (Succeeded | Failed | Skipped, Finished)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == TestState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn state_machine_allows_only_forward_transitions() {
        assert!(TestState::Pending.can_advance_to(TestState::Running));
        assert!(TestState::Pending.can_advance_to(TestState::Skipped));
        assert!(TestState::Running.can_advance_to(TestState::Failed));
        assert!(TestState::Skipped.can_advance_to(TestState::Finished));

        assert!(!TestState::Finished.can_advance_to(TestState::Running));
        assert!(!TestState::Succeeded.can_advance_to(TestState::Running));
        assert!(!TestState::Pending.can_advance_to(TestState::Finished));
        assert!(TestState::Finished.is_terminal());
    }

    #[test]
    fn unsupported_becomes_skipped_without_tip() {
        let invocation = Invocation::from_result(
            Err(TestFailure::unsupported("no such code")),
            Some(FeatureKey::StandardAliases),
        );
        assert_eq!(
            invocation.outcome,
            Outcome::Skipped {
                reason: "unsupported: no such code".to_string()
            }
        );
    }

    #[test]
    fn failures_carry_tip() {
        let invocation = Invocation::from_result(
            Err(TestFailure::assertion("name mismatch")),
            Some(FeatureKey::StandardNames),
        );
        match invocation.outcome {
            Outcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Assertion);
                assert_eq!(failure.configuration_tip, Some(FeatureKey::StandardNames));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let invocation = Invocation::from_result(Err(anyhow!("boom").into()), None);
        assert!(matches!(
            invocation.outcome,
            Outcome::Failed(Failure {
                kind: FailureKind::Unexpected,
                configuration_tip: None,
                ..
            })
        ));
    }
}
