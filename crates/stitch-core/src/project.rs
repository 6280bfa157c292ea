//! Project root detection and derived paths.
//!
//! This module provides the [`Project`] type which represents the explicit
//! project root every command operates on. No component consults the process
//! working directory; all lookups go through the paths exposed here.

use std::path::{Path, PathBuf};

use crate::config::ComponentKey;
use crate::constants::{
    AI_TOOLS_CATEGORY, CONFIG_FILENAME, GUIDELINES_DIR, TEMPLATES_DIR, TEMPLATE_EXTENSION,
    WORKFLOW_TEMPLATE_FILENAME,
};
use crate::errors::StitchError;

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a path is a disk root (e.g., C:\ on Windows, / on Unix).
fn is_disk_root(path: &Path) -> bool {
    if path.parent().is_some() {
        return false;
    }

    #[cfg(windows)]
    {
        if let Some(s) = path.to_str() {
            if s.len() >= 2 && s.chars().nth(1) == Some(':') {
                return true;
            }
        }
    }

    #[cfg(not(windows))]
    {
        if path == Path::new("/") {
            return true;
        }
    }

    path.canonicalize().ok().is_some_and(|p| p.parent().is_none())
}

/// The guideline root (`docs/guidelines`) beneath a KB or project root.
pub fn guidelines_root(base: &Path) -> PathBuf {
    GUIDELINES_DIR.iter().fold(base.to_path_buf(), |p, s| p.join(s))
}

/// The shared templates directory (`docs/templates`) beneath a KB or project root.
pub fn templates_root(base: &Path) -> PathBuf {
    TEMPLATES_DIR.iter().fold(base.to_path_buf(), |p, s| p.join(s))
}

/// The workflow template path (`docs/guidelines/ai-tools/workflow.md.mustache`)
/// beneath a KB or project root.
pub fn workflow_template_path(base: &Path) -> PathBuf {
    guidelines_root(base)
        .join(AI_TOOLS_CATEGORY)
        .join(WORKFLOW_TEMPLATE_FILENAME)
}

// ============================================================================
// Project
// ============================================================================

/// A resolved stitch project.
///
/// Holds the absolute project root. The configuration file and every synced
/// artifact are addressed relative to it.
///
/// # Example
///
/// ```ignore
/// use stitch_core::Project;
/// use std::path::Path;
///
/// let project = Project::from_root(Path::new("."))?;
/// println!("Config: {:?}", project.config_path());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Absolute path to the project root directory.
    root: PathBuf,
}

impl Project {
    /// Create a `Project` from a root directory path.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidProjectRoot`] if the path does not exist,
    /// is not a directory, or is a filesystem root.
    pub fn from_root(root: &Path) -> Result<Self, StitchError> {
        let canonical = root
            .canonicalize()
            .map_err(|e| StitchError::InvalidProjectRoot {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;

        if !canonical.is_dir() {
            return Err(StitchError::InvalidProjectRoot {
                path: canonical.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        if is_disk_root(&canonical) {
            return Err(StitchError::InvalidProjectRoot {
                path: canonical.display().to_string(),
                reason: "refusing to use a filesystem root as project root".to_string(),
            });
        }

        Ok(Self { root: canonical })
    }

    /// Get the absolute path to the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to `stitch.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    /// Path to the project's `docs/guidelines` directory.
    pub fn guidelines_dir(&self) -> PathBuf {
        guidelines_root(&self.root)
    }

    /// Path to the project's `docs/templates` directory.
    pub fn templates_dir(&self) -> PathBuf {
        templates_root(&self.root)
    }

    /// Destination directory of a synced component.
    ///
    /// The variation segment is deliberately absent: the project holds one
    /// materialized copy per component.
    pub fn component_dir(&self, key: &ComponentKey) -> PathBuf {
        self.guidelines_dir().join(&key.category).join(&key.name)
    }

    /// Where the workflow template is copied before rendering.
    pub fn workflow_template_path(&self) -> PathBuf {
        workflow_template_path(&self.root)
    }

    /// Where the rendered workflow document is written.
    ///
    /// Sibling of the template with the template extension removed.
    pub fn workflow_output_path(&self) -> PathBuf {
        let template = self.workflow_template_path();
        let stem = WORKFLOW_TEMPLATE_FILENAME
            .strip_suffix(TEMPLATE_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(WORKFLOW_TEMPLATE_FILENAME);
        template.with_file_name(stem)
    }
}
