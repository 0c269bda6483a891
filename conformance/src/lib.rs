//! Conformance test orchestration for geodetic factory implementations.
//!
//! A run binds an implementation under test to a batch of test cases:
//!
//! - **[`registry`]**: discovers factories from an explicit [`ProviderScope`],
//!   filtering authority factories by the target authority (e.g. `EPSG`).
//! - **[`orchestrator`]**: executes [`TestCase`]s sequentially, injecting the
//!   factories each one requires and publishing lifecycle events to
//!   [`TestListener`]s.
//!
//! Optional checks are gated by [`config::Configuration`] feature flags. A
//! test runs each optional section through [`TestContext::optional`]; if that
//! section fails, the failure carries a configuration tip telling the user
//! which flag to disable.

pub mod assertions;
pub mod capability;
pub mod case;
pub mod config;
pub mod listener;
pub mod logging;
pub mod orchestrator;
pub mod outcome;
pub mod registry;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::capability::{Capability, Citation, Factory};
pub use crate::case::{TestCase, TestContext};
pub use crate::config::{Configuration, FeatureKey, SuiteConfig};
pub use crate::listener::{LoggingListener, TestEvent, TestListener};
pub use crate::orchestrator::{Orchestrator, RunSummary};
pub use crate::outcome::{
    Failure, FailureKind, Invocation, Outcome, OutcomeKind, TestFailure, TestState,
};
pub use crate::registry::{ProviderScope, Registry};
pub use crate::report::{ReportListener, RunReport};
