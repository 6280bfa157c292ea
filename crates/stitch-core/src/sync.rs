//! The `sync` flow: materialize the configured selection into the project.
//!
//! Steps, in order:
//!
//! 1. Resolve and validate the KB (cloning remote references).
//! 2. Copy every selected `<category>/<name>/<variation>` to
//!    `docs/guidelines/<category>/<name>` in the project, overwriting.
//! 3. Copy `docs/templates` when the KB has one.
//! 4. Copy the workflow template, render it against the project's guideline
//!    tree, write the result beside it, and delete the template copy.
//!
//! Any failure aborts the run. Components already copied stay in place; only
//! step 4 is atomic, and its intermediate template copy never outlives the
//! run. Sync never writes `stitch.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ComponentKey, StitchConfig};
use crate::errors::StitchError;
use crate::fsutil::copy_dir_all;
use crate::project::{workflow_template_path, Project};
use crate::render::{build_sync_context, render_file};
use crate::repository::{KbRepository, RepositoryAccessor};

/// What a successful sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Components copied, in configuration order.
    pub components: Vec<ComponentKey>,
    /// Whether the KB had a `docs/templates` directory to copy.
    pub templates_copied: bool,
    /// Where the rendered workflow document was written.
    pub workflow_path: PathBuf,
    /// KB commit the content came from, when it could be read.
    pub kb_commit: Option<String>,
}

/// Run sync for `project` using `config`.
///
/// The temporary clone of a remote KB is removed before returning, whatever
/// the outcome.
///
/// # Errors
///
/// - [`StitchError::InvalidKbRepository`] if the recorded KB does not exist or
///   is not a valid checkout. Nothing in the project is touched.
/// - [`StitchError::CloneFailed`] if a remote KB cannot be cloned.
/// - [`StitchError::ComponentNotFoundInKb`] for the first selection missing
///   from the KB.
/// - [`StitchError::WorkflowTemplateNotFound`] if the KB has no workflow
///   template.
/// - [`StitchError::TemplateRender`] if rendering fails.
pub fn run_sync(
    project: &Project,
    accessor: &RepositoryAccessor,
    config: &StitchConfig,
) -> Result<SyncReport, StitchError> {
    let mut repo = accessor
        .resolve(&config.kb.repository, project.root())
        .map_err(|e| match e {
            StitchError::InvalidKbReference { reference } => StitchError::invalid_repository(
                reference,
                "path does not exist and is not a remote reference",
            ),
            other => other,
        })?;

    let result = materialize(project, &repo, config);
    if let Err(e) = repo.cleanup() {
        tracing::warn!("Failed to remove temporary clone: {}", e);
    }
    result
}

fn materialize(
    project: &Project,
    repo: &KbRepository,
    config: &StitchConfig,
) -> Result<SyncReport, StitchError> {
    let mut components = Vec::with_capacity(config.components.len());
    for selection in &config.components {
        let source = repo.component_source(selection);
        if !source.is_dir() {
            return Err(StitchError::ComponentNotFoundInKb {
                category: selection.category.clone(),
                name: selection.name.clone(),
                variation: selection.variation.clone(),
            });
        }

        let key = selection.key();
        let target = project.component_dir(&key);
        let copied = copy_dir_all(&source, &target)?;
        tracing::debug!(
            "Synced {} ({} file(s)) to {}",
            selection.triple(),
            copied,
            target.display()
        );
        components.push(key);
    }

    let templates_source = repo.templates_dir();
    let templates_copied = if templates_source.is_dir() {
        copy_dir_all(&templates_source, &project.templates_dir())?;
        tracing::debug!("Synced template directory");
        true
    } else {
        tracing::debug!("Template directory not found in KB, skipping");
        false
    };

    let template_source = repo.workflow_template_path();
    if !template_source.is_file() {
        return Err(StitchError::WorkflowTemplateNotFound(workflow_template_path(
            Path::new(""),
        )));
    }
    let workflow_path = render_workflow(project, &template_source)?;

    let kb_commit = match repo.current_commit_hash() {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::debug!("KB commit unavailable: {}", e);
            None
        }
    };

    Ok(SyncReport {
        components,
        templates_copied,
        workflow_path,
        kb_commit,
    })
}

/// Copy the template into the project, render it, and remove the copy.
///
/// The copy is removed on failure too, so no partial template is left behind.
fn render_workflow(project: &Project, template_source: &Path) -> Result<PathBuf, StitchError> {
    let template = project.workflow_template_path();
    if let Some(parent) = template.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(template_source, &template)?;

    let output = project.workflow_output_path();
    let rendered = render_file(&template, &build_sync_context(project))
        .map_err(|reason| StitchError::TemplateRender {
            path: template.clone(),
            reason,
        })
        .and_then(|content| fs::write(&output, content).map_err(StitchError::from));

    let removed = fs::remove_file(&template);
    rendered?;
    removed?;

    tracing::debug!("Rendered {}", output.display());
    Ok(output)
}
