//! Capability tags and the factory contract they resolve to.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A contract a test can depend on.
///
/// Authority factories create objects from authority codes and are bound
/// only when their declared authority matches the run's target authority.
/// Plain factories build objects from user-supplied properties and have no
/// authority concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Units,
    DatumFactory,
    CsFactory,
    CrsFactory,
    CoordinateOperationFactory,
    MathTransformFactory,
    DatumAuthorityFactory,
    CsAuthorityFactory,
    CrsAuthorityFactory,
    CoordinateOperationAuthorityFactory,
}

impl Capability {
    /// Every capability, in discovery order.
    pub const ALL: [Capability; 10] = [
        Capability::Units,
        Capability::DatumFactory,
        Capability::CsFactory,
        Capability::CrsFactory,
        Capability::CoordinateOperationFactory,
        Capability::MathTransformFactory,
        Capability::DatumAuthorityFactory,
        Capability::CsAuthorityFactory,
        Capability::CrsAuthorityFactory,
        Capability::CoordinateOperationAuthorityFactory,
    ];

    pub fn is_authority_scoped(self) -> bool {
        matches!(
            self,
            Capability::DatumAuthorityFactory
                | Capability::CsAuthorityFactory
                | Capability::CrsAuthorityFactory
                | Capability::CoordinateOperationAuthorityFactory
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Capability::Units => "units",
            Capability::DatumFactory => "datum",
            Capability::CsFactory => "coordinate system",
            Capability::CrsFactory => "CRS",
            Capability::CoordinateOperationFactory => "coordinate operation",
            Capability::MathTransformFactory => "math transform",
            Capability::DatumAuthorityFactory => "datum authority",
            Capability::CsAuthorityFactory => "coordinate system authority",
            Capability::CrsAuthorityFactory => "CRS authority",
            Capability::CoordinateOperationAuthorityFactory => "coordinate operation authority",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of an authority: a title plus alternate titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    #[serde(default)]
    pub alternate_titles: Vec<String>,
}

impl Citation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alternate_titles: Vec::new(),
        }
    }

    pub fn with_alternate_title(mut self, title: impl Into<String>) -> Self {
        self.alternate_titles.push(title.into());
        self
    }

    /// Case-sensitive substring match of `authority` against every title.
    pub fn matches(&self, authority: &str) -> bool {
        self.title.contains(authority)
            || self
                .alternate_titles
                .iter()
                .any(|title| title.contains(authority))
    }
}

/// A factory provided by the implementation under test.
///
/// Test bodies reach the concrete type through [`Factory::as_any`], usually
/// via [`crate::TestContext::get`].
pub trait Factory: Send + Sync {
    /// Human-readable name used in logs and reports.
    fn name(&self) -> &str;

    /// Authority this factory serves, if any.
    fn authority(&self) -> Option<&Citation> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}
