//! The `init` flow: pick or reuse a KB, then edit the selection.
//!
//! Both entry paths converge on the [`Reconciler`]:
//!
//! - an existing `stitch.yaml` the user agrees to modify is edited in place,
//!   against the KB it records;
//! - otherwise a KB reference is taken from the caller or prompted for,
//!   validated, written as an empty configuration, and then edited.
//!
//! Because the empty configuration is written before editing starts, exiting
//! without saving on a fresh project still leaves a valid `stitch.yaml`
//! pointing at the chosen KB.

use crate::config::{ConfigStore, StitchConfig};
use crate::errors::StitchError;
use crate::project::Project;
use crate::prompt::{InputSource, Reporter};
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::repository::{KbReference, KbRepository, RepositoryAccessor};

pub const MODIFY_EXISTING_PROMPT: &str =
    "Found existing configuration. Would you like to modify it?";
pub const KB_REFERENCE_PROMPT: &str =
    "Knowledge base repository (local path, owner/name, or git URL):";

/// How an init session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The edited configuration was written.
    Saved {
        /// Number of selected components in the written file.
        components: usize,
    },
    /// The user exited without saving.
    Discarded,
}

/// Run the init flow for `project`.
///
/// `kb_override` replaces the KB prompt for a fresh configuration. It is
/// ignored when an existing configuration is modified.
///
/// The temporary clone of a remote KB is removed before returning, whatever
/// the outcome.
pub fn run_init(
    project: &Project,
    accessor: &RepositoryAccessor,
    kb_override: Option<&str>,
    input: &mut dyn InputSource,
    reporter: &dyn Reporter,
) -> Result<InitOutcome, StitchError> {
    let store = ConfigStore::for_project(project);

    if store.exists() && input.confirm(MODIFY_EXISTING_PROMPT, true)? {
        let config = store.load()?;
        tracing::debug!(
            "Modifying existing configuration, KB `{}`",
            config.kb.repository
        );
        let repo = accessor.resolve(&config.kb.repository, project.root())?;
        return edit(repo, config, &store, input, reporter);
    }

    let reference = match kb_override {
        Some(reference) => reference.trim().to_string(),
        None => prompt_reference(project, input, reporter)?,
    };

    let repo = accessor.resolve(&reference, project.root())?;
    let config = StitchConfig::new(repo.original_reference());
    store.save(&config)?;
    tracing::debug!("Wrote empty configuration to {}", store.path().display());

    edit(repo, config, &store, input, reporter)
}

/// Prompt until the answer parses as a KB reference.
fn prompt_reference(
    project: &Project,
    input: &mut dyn InputSource,
    reporter: &dyn Reporter,
) -> Result<String, StitchError> {
    loop {
        let answer = input.get_text(KB_REFERENCE_PROMPT)?;
        let answer = answer.trim();
        match KbReference::parse(answer, project.root()) {
            Ok(_) => return Ok(answer.to_string()),
            Err(e) => reporter.warning(&format!("{}. Please try again.", e)),
        }
    }
}

fn edit(
    mut repo: KbRepository,
    config: StitchConfig,
    store: &ConfigStore,
    input: &mut dyn InputSource,
    reporter: &dyn Reporter,
) -> Result<InitOutcome, StitchError> {
    let result = Reconciler::new(&repo, input, reporter).run(config);
    if let Err(e) = repo.cleanup() {
        tracing::warn!("Failed to remove temporary clone: {}", e);
    }

    match result? {
        ReconcileOutcome::Save(config) => {
            store.save(&config)?;
            Ok(InitOutcome::Saved {
                components: config.components.len(),
            })
        }
        ReconcileOutcome::Discard => Ok(InitOutcome::Discarded),
    }
}
