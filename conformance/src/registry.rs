//! Factory discovery and per-run capability bindings.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::capability::{Capability, Factory};

type Constructor = Box<dyn Fn() -> Arc<dyn Factory> + Send + Sync>;

struct Provider {
    capability: Capability,
    constructor: Constructor,
}

/// The set of factory providers an implementation under test makes visible.
///
/// Providers are registered explicitly, in the order discovery should try
/// them. Constructors run lazily, once per [`Registry::discover`] call that
/// reaches them.
#[derive(Default)]
pub struct ProviderScope {
    providers: Vec<Provider>,
}

impl ProviderScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, C>(&mut self, capability: Capability, constructor: C) -> &mut Self
    where
        F: Factory + 'static,
        C: Fn() -> F + Send + Sync + 'static,
    {
        self.providers.push(Provider {
            capability,
            constructor: Box::new(move || Arc::new(constructor()) as Arc<dyn Factory>),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn candidates(&self, capability: Capability) -> impl Iterator<Item = &Provider> {
        self.providers
            .iter()
            .filter(move |provider| provider.capability == capability)
    }
}

/// Factories bound for one run: at most one per capability.
pub struct Registry {
    authority: String,
    bound: BTreeMap<Capability, Arc<dyn Factory>>,
}

impl Registry {
    /// Bind the first acceptable provider of every capability in `scope`.
    ///
    /// An authority-scoped candidate is accepted when it declares no
    /// authority, or when its citation matches `target_authority`. Other
    /// capabilities accept any candidate. Later candidates are ignored.
    #[instrument(skip_all, fields(authority = target_authority))]
    pub fn discover(scope: &ProviderScope, target_authority: &str) -> Self {
        let mut bound = BTreeMap::new();
        for capability in Capability::ALL {
            for provider in scope.candidates(capability) {
                let factory = (provider.constructor)();
                if accepts(capability, factory.as_ref(), target_authority) {
                    info!(%capability, factory = factory.name(), "factory bound");
                    bound.insert(capability, factory);
                    break;
                }
                warn!(
                    %capability,
                    factory = factory.name(),
                    "factory rejected: authority does not match"
                );
            }
        }
        debug!(bound = bound.len(), "discovery complete");
        Self {
            authority: target_authority.to_string(),
            bound,
        }
    }

    /// Target authority this registry was discovered for.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn lookup(&self, capability: Capability) -> Option<Arc<dyn Factory>> {
        self.bound.get(&capability).cloned()
    }

    /// Bound factory for `capability`, downcast to its concrete type.
    pub fn get<T: 'static>(&self, capability: Capability) -> Option<&T> {
        self.bound
            .get(&capability)
            .and_then(|factory| factory.as_any().downcast_ref::<T>())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.bound.contains_key(&capability)
    }

    /// Capabilities with a bound factory, in discovery order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.bound.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Release every bound factory.
    pub fn clear(&mut self) {
        if !self.bound.is_empty() {
            debug!(released = self.bound.len(), "registry cleared");
        }
        self.bound.clear();
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.clear();
    }
}

fn accepts(capability: Capability, factory: &dyn Factory, target_authority: &str) -> bool {
    if !capability.is_authority_scoped() {
        return true;
    }
    match factory.authority() {
        Some(citation) => citation.matches(target_authority),
        None => true,
    }
}
