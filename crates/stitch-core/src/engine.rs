//! Stitch engine: the entry point binding a project root to a git client.

use std::path::Path;
use std::sync::Arc;

use crate::config::{ConfigStore, StitchConfig};
use crate::errors::StitchError;
use crate::git::{GitClient, SystemGit};
use crate::init::{run_init, InitOutcome};
use crate::project::Project;
use crate::prompt::{InputSource, Reporter};
use crate::repository::RepositoryAccessor;
use crate::sync::{run_sync, SyncReport};

// ============================================================================
// StitchEngine
// ============================================================================

/// The main engine for stitch operations.
///
/// # Construction
///
/// Use [`StitchEngine::with_system_git`] for CLI usage, or
/// [`StitchEngine::new`] to inject a [`GitClient`] in tests.
///
/// # Example
///
/// ```ignore
/// use stitch_core::StitchEngine;
/// use std::path::Path;
///
/// let engine = StitchEngine::with_system_git(Path::new("."))?;
/// let report = engine.sync()?;
/// println!("Rendered {}", report.workflow_path.display());
/// ```
#[derive(Debug, Clone)]
pub struct StitchEngine {
    project: Project,
    accessor: RepositoryAccessor,
}

impl StitchEngine {
    /// Create an engine for the project at `root` using `git`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidProjectRoot`] if `root` is unusable.
    pub fn new(root: &Path, git: Arc<dyn GitClient>) -> Result<Self, StitchError> {
        let project = Project::from_root(root)?;
        tracing::debug!("Project root: {}", project.root().display());
        Ok(Self {
            project,
            accessor: RepositoryAccessor::new(git),
        })
    }

    /// Create an engine that runs the system `git` binary.
    pub fn with_system_git(root: &Path) -> Result<Self, StitchError> {
        Self::new(root, Arc::new(SystemGit))
    }

    /// The resolved project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Load the project's `stitch.yaml`.
    pub fn load_config(&self) -> Result<StitchConfig, StitchError> {
        ConfigStore::for_project(&self.project).load()
    }

    /// Create or edit the project configuration interactively.
    ///
    /// See [`run_init`].
    pub fn init(
        &self,
        kb_override: Option<&str>,
        input: &mut dyn InputSource,
        reporter: &dyn Reporter,
    ) -> Result<InitOutcome, StitchError> {
        run_init(&self.project, &self.accessor, kb_override, input, reporter)
    }

    /// Materialize the saved configuration into the project.
    ///
    /// # Errors
    ///
    /// [`StitchError::ConfigurationNotFound`] or
    /// [`StitchError::ConfigurationInvalid`] when there is no usable
    /// configuration, plus everything [`run_sync`] can return.
    pub fn sync(&self) -> Result<SyncReport, StitchError> {
        let config = self.load_config()?;
        self.sync_with(&config)
    }

    /// Materialize an already loaded configuration.
    ///
    /// For callers that read `stitch.yaml` themselves, e.g. to show the KB
    /// reference before syncing.
    pub fn sync_with(&self, config: &StitchConfig) -> Result<SyncReport, StitchError> {
        run_sync(&self.project, &self.accessor, config)
    }
}
