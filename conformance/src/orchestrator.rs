//! Sequential execution of a test batch against one registry.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::case::{TestCase, TestContext};
use crate::config::Configuration;
use crate::listener::{TestEvent, TestListener};
use crate::outcome::{Invocation, Outcome, TestFailure, TestState};
use crate::registry::Registry;

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Runs test cases one after the other and reports to listeners.
///
/// A failing, panicking or skipped test never prevents the following tests
/// from running.
pub struct Orchestrator {
    configuration: Configuration,
    listeners: Vec<Box<dyn TestListener>>,
}

impl Orchestrator {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: impl TestListener + 'static) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[instrument(skip_all, fields(authority = registry.authority(), tests = cases.len()))]
    pub fn run(&mut self, registry: &Registry, cases: &[TestCase]) -> RunSummary {
        info!("run started");
        let mut summary = RunSummary::default();
        for (index, case) in cases.iter().enumerate() {
            let event = TestEvent {
                test_id: case.id.clone(),
                index,
            };
            let outcome = self.execute(registry, case, &event);
            summary.record(&outcome);
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "run finished"
        );
        summary
    }

    #[instrument(skip_all, fields(test_id = %case.id))]
    fn execute(&mut self, registry: &Registry, case: &TestCase, event: &TestEvent) -> Outcome {
        let mut state = TestState::Pending;
        self.emit(|listener| listener.starting(event));

        let invocation = match case.missing_capability(registry) {
            Some(capability) => Invocation {
                outcome: Outcome::Skipped {
                    reason: format!("unsupported: missing {capability} factory"),
                },
                tip: None,
            },
            None => {
                advance(&mut state, TestState::Running);
                self.invoke(registry, case)
            }
        };
        advance(&mut state, invocation.outcome.state());

        match &invocation.outcome {
            Outcome::Succeeded => self.emit(|listener| listener.succeeded(event)),
            Outcome::Failed(failure) => self.emit(|listener| listener.failed(event, failure)),
            Outcome::Skipped { reason } => debug!(%reason, "skipped"),
        }
        advance(&mut state, TestState::Finished);
        self.emit(|listener| listener.finished(event, &invocation.outcome));
        invocation.outcome
    }

    /// Run the body with a fresh context; the tip dies with the context.
    fn invoke(&self, registry: &Registry, case: &TestCase) -> Invocation {
        let mut context = TestContext::new(&case.id, registry, &self.configuration);
        let result = panic::catch_unwind(AssertUnwindSafe(|| case.invoke(&mut context)))
            .unwrap_or_else(|payload| {
                Err(TestFailure::Unexpected(anyhow!(
                    "test panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });
        Invocation::from_result(result, context.tip())
    }

    fn emit(&mut self, mut notify: impl FnMut(&mut dyn TestListener)) {
        for listener in &mut self.listeners {
            notify(listener.as_mut());
        }
    }
}

fn advance(state: &mut TestState, next: TestState) {
    debug_assert!(
        state.can_advance_to(next),
        "invalid test state transition {state:?} -> {next:?}"
    );
    *state = next;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::config::FeatureKey;
    use crate::outcome::{Failure, FailureKind};
    use crate::registry::ProviderScope;
    use crate::test_support::{RecordingListener, StubFactory};

    fn registry_with_units() -> Registry {
        let mut scope = ProviderScope::new();
        scope.register(Capability::Units, || StubFactory::new("units"));
        Registry::discover(&scope, "EPSG")
    }

    #[test]
    fn failure_in_middle_does_not_stop_batch() {
        let registry = registry_with_units();
        let cases = vec![
            TestCase::new("first", &[Capability::Units], |_| Ok(())),
            TestCase::new("second", &[Capability::Units], |ctx| {
                ctx.optional(FeatureKey::StandardNames, |_| {
                    Err(anyhow!("connection reset").into())
                })
            }),
            TestCase::new("third", &[Capability::Units], |_| {
                Err(TestFailure::assertion("semi-major axis"))
            }),
        ];
        let listener = RecordingListener::new();
        let mut orchestrator = Orchestrator::new(Configuration::new());
        orchestrator.add_listener(listener.clone());

        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                succeeded: 1,
                failed: 2,
                skipped: 0
            }
        );
        assert_eq!(
            listener.events(),
            vec![
                "starting:first",
                "succeeded:first",
                "finished:first:succeeded",
                "starting:second",
                "failed:second",
                "finished:second:failed",
                "starting:third",
                "failed:third",
                "finished:third:failed",
            ]
        );

        let failures = listener.failures();
        assert_eq!(failures[0].1.kind, FailureKind::Unexpected);
        assert_eq!(failures[0].1.configuration_tip, Some(FeatureKey::StandardNames));
        assert_eq!(
            failures[1].1,
            Failure {
                kind: FailureKind::Assertion,
                message: "semi-major axis".to_string(),
                configuration_tip: None,
            }
        );
    }

    #[test]
    fn missing_capability_skips_without_running_body() {
        let registry = registry_with_units();
        let cases = vec![TestCase::new("crs", &[Capability::CrsAuthorityFactory], |_| {
            panic!("body must not run")
        })];
        let listener = RecordingListener::new();
        let mut orchestrator = Orchestrator::new(Configuration::new());
        orchestrator.add_listener(listener.clone());

        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            listener.events(),
            vec!["starting:crs", "finished:crs:skipped"]
        );
    }

    #[test]
    fn panicking_body_is_reported_as_unexpected_failure() {
        let registry = registry_with_units();
        let cases = vec![
            TestCase::new("panics", &[], |_| panic!("index out of bounds")),
            TestCase::new("after", &[], |_| Ok(())),
        ];
        let listener = RecordingListener::new();
        let mut orchestrator = Orchestrator::new(Configuration::new());
        orchestrator.add_listener(listener.clone());

        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        let failures = listener.failures();
        assert!(failures[0].1.message.contains("index out of bounds"));
    }

    #[test]
    fn disabled_optional_section_is_skipped_and_test_passes() {
        let registry = registry_with_units();
        let mut configuration = Configuration::new();
        configuration.set(FeatureKey::DeprecatedObjects, false);
        let cases = vec![TestCase::new("deprecated", &[], |ctx| {
            ctx.optional(FeatureKey::DeprecatedObjects, |_| {
                Err(TestFailure::assertion("deprecated object not found"))
            })
        })];
        let mut orchestrator = Orchestrator::new(configuration);
        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(summary.succeeded, 1);
    }

    #[test]
    fn mandatory_failure_after_passing_optional_section_has_no_tip() {
        let registry = registry_with_units();
        let cases = vec![TestCase::new("ellipsoid-7030", &[], |ctx| {
            ctx.optional(FeatureKey::StandardNames, |_| Ok(()))?;
            Err(TestFailure::assertion("semi-major axis mismatch"))
        })];
        let listener = RecordingListener::new();
        let mut orchestrator = Orchestrator::new(Configuration::new());
        orchestrator.add_listener(listener.clone());

        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(summary.failed, 1);
        let failures = listener.failures();
        assert_eq!(failures[0].1.message, "semi-major axis mismatch");
        assert_eq!(failures[0].1.configuration_tip, None);
    }

    #[test]
    fn unsupported_inside_body_is_skipped() {
        let registry = registry_with_units();
        let cases = vec![TestCase::new("code-9999", &[], |_| {
            Err(TestFailure::unsupported("no object for code 9999"))
        })];
        let listener = RecordingListener::new();
        let mut orchestrator = Orchestrator::new(Configuration::new());
        orchestrator.add_listener(listener.clone());
        let summary = orchestrator.run(&registry, &cases);
        assert_eq!(summary.skipped, 1);
        assert!(listener.failures().is_empty());
    }
}
