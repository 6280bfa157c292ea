//! Knowledge base repository resolution.
//!
//! A KB reference is whatever the user typed: a local directory, an
//! `owner/name` shorthand, or a git URL. [`RepositoryAccessor::resolve`] turns
//! it into a [`KbRepository`] handle rooted at a usable local directory,
//! cloning remote references into a temporary directory owned by the handle.
//!
//! The temporary clone is removed by [`KbRepository::cleanup`] or, failing
//! that, when the handle is dropped. Every exit path of a command therefore
//! releases it, including early returns through `?` and panics.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::ComponentSelection;
use crate::constants::{GIT_METADATA_DIR, REMOTE_PREFIXES, TEMP_CLONE_PREFIX, TRUNK_BRANCHES};
use crate::errors::StitchError;
use crate::git::GitClient;
use crate::project::{guidelines_root, templates_root, workflow_template_path};

/// Directory inside the temporary directory that receives the clone.
const CLONE_DIR_NAME: &str = "kb";

// ============================================================================
// KbReference
// ============================================================================

/// A parsed KB reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KbReference {
    /// A remote git URL (shorthands are already expanded).
    Remote(String),
    /// An existing local directory.
    Local(PathBuf),
}

impl KbReference {
    /// Parse a user-supplied reference.
    ///
    /// Rules, in order:
    /// 1. A recognized remote prefix (`git@`, `https://`, ...) is a URL.
    /// 2. An existing directory (relative paths resolve against `base_dir`) is local.
    /// 3. An `owner/name` shorthand becomes `git@github.com:owner/name.git`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidKbReference`] when none of the rules apply.
    pub fn parse(reference: &str, base_dir: &Path) -> Result<Self, StitchError> {
        let trimmed = reference.trim();
        let invalid = || StitchError::InvalidKbReference {
            reference: reference.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid());
        }

        if is_remote_url(trimmed) {
            return Ok(Self::Remote(trimmed.to_string()));
        }

        let candidate = Path::new(trimmed);
        let local = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            base_dir.join(candidate)
        };
        if local.is_dir() {
            let local = local.canonicalize().unwrap_or(local);
            return Ok(Self::Local(local));
        }

        if let Some(url) = expand_shorthand(trimmed) {
            return Ok(Self::Remote(url));
        }

        Err(invalid())
    }

    /// Whether this reference requires a clone.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Check if a reference starts with a recognized remote prefix.
pub fn is_remote_url(reference: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| reference.starts_with(p))
}

/// Expand an `owner/name` shorthand into an SSH GitHub URL.
///
/// Returns `None` unless the input is exactly two non-empty segments made of
/// alphanumerics, `-`, `_`, or `.` (and neither segment is `.` or `..`).
pub fn expand_shorthand(reference: &str) -> Option<String> {
    let mut parts = reference.split('/');
    let (owner, name) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let valid_segment = |s: &str| {
        !s.is_empty()
            && s != "."
            && s != ".."
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if !valid_segment(owner) || !valid_segment(name) {
        return None;
    }

    let name = name.strip_suffix(".git").unwrap_or(name);
    Some(format!("git@github.com:{}/{}.git", owner, name))
}

// ============================================================================
// KbRepository
// ============================================================================

/// A resolved, validated KB checkout.
#[derive(Debug)]
pub struct KbRepository {
    /// Local root of the checkout (the clone directory for remotes).
    root: PathBuf,
    /// The reference exactly as the user supplied it.
    original_reference: String,
    /// Owner of the temporary clone, if one was made.
    temp: Option<TempDir>,
    git: Arc<dyn GitClient>,
}

impl KbRepository {
    /// Local filesystem root of the KB.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The reference as originally supplied, suitable for persisting.
    pub fn original_reference(&self) -> &str {
        &self.original_reference
    }

    /// Whether the root is a temporary clone.
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// The KB's `docs/guidelines` directory.
    pub fn guidelines_dir(&self) -> PathBuf {
        guidelines_root(&self.root)
    }

    /// The KB's `docs/templates` directory.
    pub fn templates_dir(&self) -> PathBuf {
        templates_root(&self.root)
    }

    /// The KB's workflow template.
    pub fn workflow_template_path(&self) -> PathBuf {
        workflow_template_path(&self.root)
    }

    /// Source directory of a selection: `docs/guidelines/<category>/<name>/<variation>`.
    pub fn component_source(&self, selection: &ComponentSelection) -> PathBuf {
        self.guidelines_dir()
            .join(&selection.category)
            .join(&selection.name)
            .join(&selection.variation)
    }

    /// Current commit hash of the KB checkout.
    pub fn current_commit_hash(&self) -> Result<String, StitchError> {
        self.git
            .head_commit(&self.root)
            .map_err(|source| StitchError::CommitLookupFailed {
                path: self.root.clone(),
                source,
            })
    }

    /// Remove the temporary clone, if any.
    ///
    /// Idempotent; a no-op for local references.
    pub fn cleanup(&mut self) -> Result<(), StitchError> {
        if let Some(temp) = self.temp.take() {
            let path = temp.path().to_path_buf();
            temp.close()?;
            tracing::debug!("Removed temporary clone {}", path.display());
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), StitchError> {
        let display = self.root.display().to_string();

        if !self.root.is_dir() {
            return Err(StitchError::invalid_repository(display, "not a directory"));
        }
        if !self.root.join(GIT_METADATA_DIR).exists() {
            return Err(StitchError::invalid_repository(
                display,
                "not a git repository (missing .git)",
            ));
        }
        if !self.guidelines_dir().is_dir() {
            return Err(StitchError::invalid_repository(
                display,
                "missing docs/guidelines directory",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// RepositoryAccessor
// ============================================================================

/// Resolves KB references into validated [`KbRepository`] handles.
///
/// Used by both init and sync, so remote references behave the same in both.
#[derive(Debug, Clone)]
pub struct RepositoryAccessor {
    git: Arc<dyn GitClient>,
}

impl RepositoryAccessor {
    /// Create an accessor using the given git client.
    pub fn new(git: Arc<dyn GitClient>) -> Self {
        Self { git }
    }

    /// Resolve and validate a KB reference.
    ///
    /// Relative local paths resolve against `base_dir`. Remote references are
    /// shallow-cloned from `main`, falling back to `master`.
    ///
    /// # Errors
    ///
    /// - [`StitchError::InvalidKbReference`] if the reference cannot be parsed.
    /// - [`StitchError::CloneFailed`] if both trunk clones fail; carries the
    ///   first failure.
    /// - [`StitchError::InvalidKbRepository`] if the root is not a git
    ///   checkout or lacks `docs/guidelines`.
    pub fn resolve(&self, reference: &str, base_dir: &Path) -> Result<KbRepository, StitchError> {
        let parsed = KbReference::parse(reference, base_dir)?;
        tracing::debug!("KB reference `{}` parsed as {:?}", reference, parsed);

        let (root, temp) = match parsed {
            KbReference::Local(path) => (path, None),
            KbReference::Remote(url) => {
                let temp = self.clone_remote(&url)?;
                (temp.path().join(CLONE_DIR_NAME), Some(temp))
            }
        };

        let repo = KbRepository {
            root,
            original_reference: reference.to_string(),
            temp,
            git: Arc::clone(&self.git),
        };
        repo.validate()?;

        tracing::debug!(
            "Resolved KB `{}` to {}",
            repo.original_reference,
            repo.root.display()
        );
        Ok(repo)
    }

    fn clone_remote(&self, url: &str) -> Result<TempDir, StitchError> {
        let temp = tempfile::Builder::new()
            .prefix(TEMP_CLONE_PREFIX)
            .tempdir()?;
        let dest = temp.path().join(CLONE_DIR_NAME);

        let mut first_error = None;
        for branch in TRUNK_BRANCHES {
            tracing::info!("Cloning {} (branch `{}`)", url, branch);
            match self.git.clone_shallow(url, branch, &dest) {
                Ok(()) => return Ok(temp),
                Err(e) => {
                    tracing::debug!("Clone of branch `{}` failed: {}", branch, e);
                    if dest.exists() {
                        fs::remove_dir_all(&dest)?;
                    }
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => Err(StitchError::CloneFailed {
                url: url.to_string(),
                source,
            }),
            None => Ok(temp),
        }
    }
}
