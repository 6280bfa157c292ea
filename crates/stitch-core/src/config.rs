//! Project configuration (`stitch.yaml`) types and persistence.
//!
//! - [`StitchConfig`]: the whole document (KB reference + selected components)
//! - [`ComponentSelection`]: one selected component/variation with version stamps
//! - [`ComponentKey`]: the identity of a selection, `(category, name)`
//! - [`ConfigStore`]: load/save/exists against a project root
//!
//! # Example YAML
//!
//! ```yaml
//! kb:
//!   repository: org/guidelines-kb
//! components:
//!   - category: tech-stack
//!     name: nestjs
//!     variation: default
//!     current_version: 3f2c1e...
//!     checked_version: 3f2c1e...
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::StitchError;
use crate::project::Project;

// ============================================================================
// ComponentKey
// ============================================================================

/// Identity of a component selection.
///
/// Variation and version stamps are mutable attributes, not identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    /// Category directory name (e.g. `tech-stack`).
    pub category: String,
    /// Component directory name (e.g. `nestjs`).
    pub name: String,
}

impl ComponentKey {
    /// Create a key from its parts.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

// ============================================================================
// ComponentSelection
// ============================================================================

/// A selected KB component and the variation chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSelection {
    /// Category directory name.
    pub category: String,
    /// Component directory name.
    pub name: String,
    /// Variation directory name.
    pub variation: String,
    /// KB commit hash at the time of add/replace.
    pub current_version: String,
    /// KB commit hash last acknowledged. Written once at add time.
    pub checked_version: String,
}

impl ComponentSelection {
    /// Create a selection stamped with `commit` as both version fields.
    pub fn stamped(
        category: impl Into<String>,
        name: impl Into<String>,
        variation: impl Into<String>,
        commit: &str,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            variation: variation.into(),
            current_version: commit.to_string(),
            checked_version: commit.to_string(),
        }
    }

    /// The identity key of this selection.
    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(&self.category, &self.name)
    }

    /// Whether this selection has the given identity key.
    pub fn has_key(&self, key: &ComponentKey) -> bool {
        self.category == key.category && self.name == key.name
    }

    /// `category/name/variation`, the label used in prompts and listings.
    pub fn triple(&self) -> String {
        format!("{}/{}/{}", self.category, self.name, self.variation)
    }
}

// ============================================================================
// StitchConfig
// ============================================================================

/// The `kb` section of `stitch.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbSection {
    /// The original user-supplied reference (path, `owner/name`, or URL).
    ///
    /// Never the resolved or cloned path, so the file stays portable.
    pub repository: String,
}

/// The persisted project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Knowledge base reference.
    pub kb: KbSection,
    /// Selected components, in insertion order.
    #[serde(default)]
    pub components: Vec<ComponentSelection>,
}

impl StitchConfig {
    /// Create an empty configuration pointing at `repository`.
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            kb: KbSection {
                repository: repository.into(),
            },
            components: Vec::new(),
        }
    }

    /// Find the selection with the given identity key.
    pub fn find(&self, key: &ComponentKey) -> Option<&ComponentSelection> {
        self.components.iter().find(|c| c.has_key(key))
    }

    /// Insert a selection, replacing any existing one with the same key.
    ///
    /// Returns the replaced selection, if any. This is the only mutation that
    /// adds entries, so no two entries ever share a key.
    pub fn upsert(&mut self, selection: ComponentSelection) -> Option<ComponentSelection> {
        let key = selection.key();
        let replaced = self
            .components
            .iter()
            .position(|c| c.has_key(&key))
            .map(|idx| self.components.remove(idx));
        self.components.push(selection);
        replaced
    }

    /// Remove every selection matching one of the given `(category, name, variation)` triples.
    ///
    /// Returns the number of removed entries.
    pub fn remove_exact(&mut self, targets: &[ComponentSelection]) -> usize {
        let before = self.components.len();
        self.components.retain(|c| {
            !targets.iter().any(|t| {
                t.category == c.category && t.name == c.name && t.variation == c.variation
            })
        });
        before - self.components.len()
    }

    fn validate(&self) -> Result<(), String> {
        if self.kb.repository.trim().is_empty() {
            return Err("kb.repository must not be empty".to_string());
        }
        for (idx, c) in self.components.iter().enumerate() {
            if self.components[..idx].iter().any(|prev| prev.has_key(&c.key())) {
                return Err(format!("duplicate component entry {}", c.key()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// ConfigStore
// ============================================================================

/// Loads and saves `stitch.yaml` at a project root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for the configuration file of `project`.
    pub fn for_project(project: &Project) -> Self {
        Self::at(project.config_path())
    }

    /// Store for an explicit configuration file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the configuration.
    ///
    /// # Errors
    ///
    /// - [`StitchError::ConfigurationNotFound`] if the file is absent.
    /// - [`StitchError::ConfigurationInvalid`] if it cannot be read, parsed,
    ///   or misses required fields.
    pub fn load(&self) -> Result<StitchConfig, StitchError> {
        if !self.exists() {
            return Err(StitchError::ConfigurationNotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.invalid(e.to_string()))?;

        let config: StitchConfig =
            serde_yaml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;

        config.validate().map_err(|reason| self.invalid(reason))?;

        tracing::debug!(
            "Loaded {} with {} component(s)",
            self.path.display(),
            config.components.len()
        );
        Ok(config)
    }

    /// Write the configuration, replacing any existing file.
    pub fn save(&self, config: &StitchConfig) -> Result<(), StitchError> {
        let yaml = serde_yaml::to_string(config)?;
        fs::write(&self.path, yaml)?;
        tracing::debug!(
            "Saved {} with {} component(s)",
            self.path.display(),
            config.components.len()
        );
        Ok(())
    }

    fn invalid(&self, reason: String) -> StitchError {
        StitchError::ConfigurationInvalid {
            path: self.path.clone(),
            reason,
        }
    }
}
