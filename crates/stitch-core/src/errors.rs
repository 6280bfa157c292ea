//! Error types for stitch-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for stitch operations.
///
/// Display strings are single-line summaries. Underlying causes live in
/// `reason` fields or `#[source]` chains and are only printed in debug output.
#[derive(Error, Debug)]
pub enum StitchError {
    // =========================================================================
    // Knowledge Base Errors
    // =========================================================================
    /// The KB reference is neither a remote URL, an existing directory, nor
    /// an `owner/name` shorthand.
    #[error("Invalid KB reference `{reference}`: expected a local directory, `owner/name`, or a git URL")]
    InvalidKbReference {
        /// The reference as supplied by the user.
        reference: String,
    },

    /// The resolved KB is not a git checkout or lacks `docs/guidelines`.
    #[error("Invalid KB repository: {path}")]
    InvalidKbRepository {
        /// The path (or reference) that failed validation.
        path: String,
        /// What exactly was missing.
        reason: String,
    },

    /// Cloning a remote KB failed on every trunk branch.
    ///
    /// The carried source is the error of the first attempt.
    #[error("Failed to clone KB repository `{url}`")]
    CloneFailed {
        /// The normalized remote URL.
        url: String,
        /// The git failure of the first clone attempt.
        #[source]
        source: GitError,
    },

    /// Reading the KB commit hash failed.
    #[error("Failed to read current commit of {}", .path.display())]
    CommitLookupFailed {
        /// The KB root.
        path: PathBuf,
        /// The underlying git failure.
        #[source]
        source: GitError,
    },

    /// The catalog scan found no component with at least one variation.
    ///
    /// The message names the layout convention;
    /// [`EXPECTED_LAYOUT_HINT`](crate::constants::EXPECTED_LAYOUT_HINT)
    /// carries the full example tree for frontends.
    #[error("No available components found in the KB repository (expected docs/guidelines/<category>/<component>/<variation>/)")]
    NoComponentsAvailable,

    /// A configured selection has no matching directory in the KB.
    #[error("Component not found in KB: {category}/{name}/{variation}")]
    ComponentNotFoundInKb {
        /// Component category.
        category: String,
        /// Component name.
        name: String,
        /// Selected variation.
        variation: String,
    },

    /// The required `ai-tools/workflow.md.mustache` template is absent.
    #[error("Workflow template not found in KB: {}", .0.display())]
    WorkflowTemplateNotFound(PathBuf),

    /// Rendering the workflow template failed.
    #[error("Failed to render workflow template {}", .path.display())]
    TemplateRender {
        /// The template path inside the project.
        path: PathBuf,
        /// Renderer message.
        reason: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// No `stitch.yaml` at the project root.
    #[error("Configuration not found at {}", .0.display())]
    ConfigurationNotFound(PathBuf),

    /// `stitch.yaml` exists but cannot be parsed or misses required fields.
    #[error("Configuration invalid at {}", .path.display())]
    ConfigurationInvalid {
        /// Path to the configuration file.
        path: PathBuf,
        /// Parser or validation message.
        reason: String,
    },

    // =========================================================================
    // Project Errors
    // =========================================================================
    /// The project root does not exist, is not a directory, or is a disk root.
    #[error("Invalid project root: {path}")]
    InvalidProjectRoot {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    // =========================================================================
    // Interaction Errors
    // =========================================================================
    /// The user cancelled an interactive prompt.
    #[error("Prompt cancelled")]
    PromptCancelled,

    /// An interactive prompt failed or received an unusable answer.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StitchError {
    /// Shorthand for an [`StitchError::InvalidKbRepository`].
    pub fn invalid_repository(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKbRepository {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Return the non-displayed detail carried by this error, if any.
    ///
    /// Callers print this only in debug mode.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidKbRepository { reason, .. }
            | Self::TemplateRender { reason, .. }
            | Self::ConfigurationInvalid { reason, .. }
            | Self::InvalidProjectRoot { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Errors raised by git plumbing.
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary could not be spawned.
    #[error("Failed to execute `{command}`. Is git installed?")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// The spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// git ran but exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Trimmed standard error of the git process.
        stderr: String,
    },
}
