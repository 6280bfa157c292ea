//! Workflow document rendering.
//!
//! The context is derived from the project's own guideline tree after
//! components are copied, not from the configuration, so the document lists
//! exactly what is on disk. The reserved `ai-tools` category is left out so
//! the workflow document never lists itself.

use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::constants::{is_hidden_entry, AI_TOOLS_CATEGORY, GUIDELINES_DIR};
use crate::project::Project;

/// A synced component as seen by the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowComponent {
    pub name: String,
    /// `docs/guidelines/<category>/<component>`, always `/`-separated.
    pub relative_path: String,
}

/// A category as seen by the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowCategory {
    pub name: String,
    pub components: Vec<WorkflowComponent>,
}

/// Root object handed to the workflow template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncContext {
    pub categories: Vec<WorkflowCategory>,
}

/// Walk the project's `docs/guidelines` two levels deep and build the context.
///
/// Categories and components are sorted by name. A missing guideline
/// directory yields an empty context.
pub fn build_sync_context(project: &Project) -> SyncContext {
    let root = project.guidelines_dir();
    if !root.is_dir() {
        return SyncContext::default();
    }

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            let reserved = e.depth() == 1 && name == AI_TOOLS_CATEGORY;
            !is_hidden_entry(&name) && !reserved
        });

    let mut categories: Vec<WorkflowCategory> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable guideline entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        match entry.depth() {
            1 => categories.push(WorkflowCategory {
                name,
                components: Vec::new(),
            }),
            _ => {
                let Some(category) = categories.last_mut() else {
                    continue;
                };
                category.components.push(WorkflowComponent {
                    relative_path: relative_component_path(&category.name, &name),
                    name,
                });
            }
        }
    }

    tracing::debug!(
        "Sync context from {}: {} categories",
        root.display(),
        categories.len()
    );
    SyncContext { categories }
}

fn relative_component_path(category: &str, component: &str) -> String {
    let mut segments: Vec<&str> = GUIDELINES_DIR.to_vec();
    segments.push(category);
    segments.push(component);
    segments.join("/")
}

/// Render the Mustache `template` against `context` with literal substitution.
///
/// Escaping is switched off on purpose: HTML escaping would rewrite `&`,
/// `<`, `>` and quotes into entities, corrupting names and paths. The engine
/// has no such switch, so escaped variable tags are turned into their
/// unescaped `{{&name}}` form before compiling.
pub fn render_literal(template: &str, context: &SyncContext) -> Result<String, String> {
    let compiled =
        mustache::compile_str(&unescape_variable_tags(template)).map_err(|e| e.to_string())?;

    let mut out = Vec::new();
    compiled
        .render(&mut out, context)
        .map_err(|e| e.to_string())?;
    String::from_utf8(out).map_err(|e| e.to_string())
}

/// Rewrite every `{{name}}` into `{{&name}}`.
///
/// Sections, inverted sections, comments, partials and already unescaped
/// tags are kept as written. A set-delimiter tag stops the rewrite; the rest
/// of the template renders with the engine's default escaping.
fn unescape_variable_tags(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tag = &rest[start + 2..];
        match tag.trim_start().chars().next() {
            Some('=') => {
                out.push_str(&rest[start..]);
                return out;
            }
            Some('{' | '&' | '#' | '^' | '/' | '!' | '>') | None => out.push_str("{{"),
            Some(_) => out.push_str("{{&"),
        }
        rest = tag;
    }

    out.push_str(rest);
    out
}

/// Convenience for callers holding a template path.
pub fn render_file(template_path: &Path, context: &SyncContext) -> Result<String, String> {
    let template = std::fs::read_to_string(template_path).map_err(|e| e.to_string())?;
    render_literal(&template, context)
}
