//! Suite configuration: target authority, dataset root and optional features.
//!
//! Stored as TOML, e.g. `gigs.toml`:
//!
//! ```toml
//! authority = "EPSG"
//! data_dir = "/srv/gigs"
//!
//! [features]
//! standard_aliases = false
//!
//! [overrides.ellipsoid-7030]
//! standard_aliases = true
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use dataset::DatasetLocator;
use serde::{Deserialize, Serialize};

/// Optional features a test may check, each of which an implementation may
/// legitimately not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    FactoryPreservesUserValues,
    DeprecatedObjects,
    StandardNames,
    StandardAliases,
    DependencyIdentification,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 5] = [
        FeatureKey::FactoryPreservesUserValues,
        FeatureKey::DeprecatedObjects,
        FeatureKey::StandardNames,
        FeatureKey::StandardAliases,
        FeatureKey::DependencyIdentification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::FactoryPreservesUserValues => "factory_preserves_user_values",
            FeatureKey::DeprecatedObjects => "deprecated_objects",
            FeatureKey::StandardNames => "standard_names",
            FeatureKey::StandardAliases => "standard_aliases",
            FeatureKey::DependencyIdentification => "dependency_identification",
        }
    }

    /// Suggestion shown when a check guarded by this feature fails.
    pub fn tip(self) -> String {
        let condition = match self {
            FeatureKey::FactoryPreservesUserValues => {
                "the factory is allowed to normalize the values it was given"
            }
            FeatureKey::DeprecatedObjects => "deprecated objects are not supported",
            FeatureKey::StandardNames => "objects are not expected to carry the standard name",
            FeatureKey::StandardAliases => "objects are not expected to carry standard aliases",
            FeatureKey::DependencyIdentification => {
                "dependencies are not expected to keep their authority identifiers"
            }
        };
        format!("set `features.{} = false` if {condition}", self.as_str())
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        FeatureKey::ALL
            .into_iter()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| anyhow!("unknown feature {name:?}"))
    }
}

/// Feature flags with per-test overrides. Every feature defaults to enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    defaults: BTreeMap<FeatureKey, bool>,
    overrides: BTreeMap<String, BTreeMap<FeatureKey, bool>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FeatureKey, enabled: bool) -> &mut Self {
        self.defaults.insert(key, enabled);
        self
    }

    pub fn set_for_test(&mut self, test_id: &str, key: FeatureKey, enabled: bool) -> &mut Self {
        self.overrides
            .entry(test_id.to_string())
            .or_default()
            .insert(key, enabled);
        self
    }

    /// Test-scoped override first, then the global flag, then `true`.
    pub fn is_enabled(&self, test_id: &str, key: FeatureKey) -> bool {
        self.overrides
            .get(test_id)
            .and_then(|features| features.get(&key))
            .or_else(|| self.defaults.get(&key))
            .copied()
            .unwrap_or(true)
    }
}

/// Suite configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuiteConfig {
    /// Authority that authority factories must serve (substring of the citation title).
    pub authority: String,

    /// Dataset root directory. Falls back to `GIGS_DATA_DIR` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Global feature flags, keyed by feature name.
    pub features: BTreeMap<String, bool>,

    /// Per-test feature flags, keyed by test id then feature name.
    pub overrides: BTreeMap<String, BTreeMap<String, bool>>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            authority: "EPSG".to_string(),
            data_dir: None,
            features: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl SuiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.authority.trim().is_empty() {
            bail!("authority must be non-empty");
        }
        for name in self.features.keys() {
            name.parse::<FeatureKey>()
                .with_context(|| format!("features.{name}"))?;
        }
        for (test_id, features) in &self.overrides {
            if test_id.trim().is_empty() {
                bail!("override test id must be non-empty");
            }
            for name in features.keys() {
                name.parse::<FeatureKey>()
                    .with_context(|| format!("overrides.{test_id}.{name}"))?;
            }
        }
        Ok(())
    }

    /// Feature flags as a [`Configuration`].
    pub fn configuration(&self) -> Result<Configuration> {
        let mut configuration = Configuration::new();
        for (name, enabled) in &self.features {
            configuration.set(name.parse()?, *enabled);
        }
        for (test_id, features) in &self.overrides {
            for (name, enabled) in features {
                configuration.set_for_test(test_id, name.parse()?, *enabled);
            }
        }
        Ok(configuration)
    }

    /// Dataset locator for `data_dir`, or for `GIGS_DATA_DIR` when unset.
    pub fn locator(&self) -> Result<DatasetLocator> {
        let locator = match &self.data_dir {
            Some(dir) => DatasetLocator::new(dir.clone()),
            None => DatasetLocator::from_env(),
        };
        locator.context("resolve dataset root")
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SuiteConfig::default()`.
pub fn load_config(path: &Path) -> Result<SuiteConfig> {
    if !path.exists() {
        return Ok(SuiteConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SuiteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SuiteConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
