//! Common constants used throughout stitch-core.
//!
//! This module centralizes file names, reserved directories, and git
//! conventions so the scanner, the sync engine, and the repository accessor
//! agree on one on-disk contract.

// ============================================================================
// Project Files
// ============================================================================

/// The project configuration file, stored at the project root.
pub const CONFIG_FILENAME: &str = "stitch.yaml";

// ============================================================================
// Knowledge Base Layout
// ============================================================================

/// Path segments of the guideline root, relative to a KB or project root.
///
/// Layout: `docs/guidelines/<category>/<component>/<variation>/...`
pub const GUIDELINES_DIR: [&str; 2] = ["docs", "guidelines"];

/// Path segments of the shared templates directory, relative to a KB or project root.
pub const TEMPLATES_DIR: [&str; 2] = ["docs", "templates"];

/// Reserved category holding tooling documents.
///
/// Excluded from the sync context so the workflow document never lists itself.
pub const AI_TOOLS_CATEGORY: &str = "ai-tools";

/// File name of the required workflow template inside [`AI_TOOLS_CATEGORY`].
pub const WORKFLOW_TEMPLATE_FILENAME: &str = "workflow.md.mustache";

/// Extension stripped from the workflow template to obtain the rendered file name.
pub const TEMPLATE_EXTENSION: &str = "mustache";

/// Optional metadata file inside a component or variation directory.
pub const METADATA_FILENAME: &str = "metadata.yaml";

/// Human-readable description of the KB layout, shown when nothing is selectable.
pub const EXPECTED_LAYOUT_HINT: &str = "\
Expected layout: docs/guidelines/<category>/<component>/<variation>/...
Example:
  docs/guidelines/
  └── tech-stack
      └── nestjs
          ├── default
          └── exp1";

// ============================================================================
// Git Conventions
// ============================================================================

/// Trunk branch names tried in order when cloning a remote KB.
pub const TRUNK_BRANCHES: [&str; 2] = ["main", "master"];

/// Prefixes that mark a KB reference as a remote git URL.
pub const REMOTE_PREFIXES: &[&str] = &["git@", "https://", "http://", "ssh://", "git://", "file://"];

/// Repository metadata entry whose presence marks a version-controlled checkout.
pub const GIT_METADATA_DIR: &str = ".git";

/// Prefix for temporary clone directories.
pub const TEMP_CLONE_PREFIX: &str = "stitch-";

/// Check if a directory entry name is hidden (e.g. `.git`, `.DS_Store`).
///
/// Hidden entries are never categories, components, or variations.
#[inline]
pub fn is_hidden_entry(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hidden_entry() {
        assert!(is_hidden_entry(".git"));
        assert!(is_hidden_entry(".DS_Store"));
        assert!(!is_hidden_entry("nestjs"));
        assert!(!is_hidden_entry("tech-stack"));
    }

    #[test]
    fn test_trunk_branch_order() {
        assert_eq!(TRUNK_BRANCHES[0], "main");
        assert_eq!(TRUNK_BRANCHES[1], "master");
    }
}
