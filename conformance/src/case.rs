//! Test case definitions and the context handed to each test body.

use std::fmt;
use std::sync::Arc;

use crate::capability::{Capability, Factory};
use crate::config::{Configuration, FeatureKey};
use crate::outcome::TestFailure;
use crate::registry::Registry;

type Body = Box<dyn Fn(&mut TestContext<'_>) -> Result<(), TestFailure>>;

/// One conformance test: an id, the capabilities it needs, and a body.
pub struct TestCase {
    pub id: String,
    pub requires: Vec<Capability>,
    body: Body,
}

impl TestCase {
    pub fn new<F>(id: impl Into<String>, requires: &[Capability], body: F) -> Self
    where
        F: Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + 'static,
    {
        Self {
            id: id.into(),
            requires: requires.to_vec(),
            body: Box::new(body),
        }
    }

    /// First required capability the registry cannot provide.
    pub fn missing_capability(&self, registry: &Registry) -> Option<Capability> {
        self.requires
            .iter()
            .copied()
            .find(|capability| !registry.contains(*capability))
    }

    pub(crate) fn invoke(&self, context: &mut TestContext<'_>) -> Result<(), TestFailure> {
        (self.body)(context)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Per-invocation view of the run: bound factories, feature flags and the
/// configuration tip of the optional section that is running or has failed.
pub struct TestContext<'a> {
    test_id: &'a str,
    registry: &'a Registry,
    configuration: &'a Configuration,
    tip: Option<FeatureKey>,
}

impl<'a> TestContext<'a> {
    pub fn new(test_id: &'a str, registry: &'a Registry, configuration: &'a Configuration) -> Self {
        Self {
            test_id,
            registry,
            configuration,
            tip: None,
        }
    }

    pub fn test_id(&self) -> &str {
        self.test_id
    }

    /// Bound factory for `capability`; an absent one makes the test unsupported.
    pub fn factory(&self, capability: Capability) -> Result<Arc<dyn Factory>, TestFailure> {
        self.registry
            .lookup(capability)
            .ok_or_else(|| TestFailure::unsupported(format!("missing {capability} factory")))
    }

    /// Bound factory for `capability` as its concrete type.
    pub fn get<T: 'static>(&self, capability: Capability) -> Result<&'a T, TestFailure> {
        self.registry.get::<T>(capability).ok_or_else(|| {
            TestFailure::unsupported(format!(
                "{capability} factory is missing or of an unexpected type"
            ))
        })
    }

    pub fn is_enabled(&self, key: FeatureKey) -> bool {
        self.configuration.is_enabled(self.test_id, key)
    }

    /// Run an optional section guarded by `key`.
    ///
    /// A disabled feature skips the section. Otherwise `key` is the
    /// configuration tip while the section runs; it stays set only when the
    /// section fails, so that failure points at the flag to disable.
    pub fn optional<F>(&mut self, key: FeatureKey, section: F) -> Result<(), TestFailure>
    where
        F: FnOnce(&mut Self) -> Result<(), TestFailure>,
    {
        if !self.is_enabled(key) {
            return Ok(());
        }
        let outer = self.tip.replace(key);
        let result = section(self);
        if result.is_ok() {
            self.tip = outer;
        }
        result
    }

    pub fn tip(&self) -> Option<FeatureKey> {
        self.tip
    }
}
