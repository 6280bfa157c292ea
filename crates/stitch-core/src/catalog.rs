//! KB catalog scanning.
//!
//! The catalog is the three-level directory listing under a KB's
//! `docs/guidelines`: categories, components, and variations. A component is
//! only listed when it has at least one variation directory.
//!
//! Components and variations may carry an optional `metadata.yaml`. Metadata
//! is decorative: a malformed file is logged and ignored, never fatal.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{is_hidden_entry, METADATA_FILENAME};
use crate::errors::StitchError;
use crate::project::guidelines_root;

// ============================================================================
// Metadata
// ============================================================================

/// Optional `metadata.yaml` of a component directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComponentMetadata {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Maturity of a variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationStatus {
    Stable,
    Experimental,
}

/// Optional `metadata.yaml` of a variation directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariationMetadata {
    pub name: Option<String>,
    pub status: Option<VariationStatus>,
    pub created_at: Option<String>,
    pub purpose: Option<String>,
    pub target_audience: Option<String>,
}

fn load_metadata<T: for<'de> Deserialize<'de>>(dir: &Path) -> Option<T> {
    let path = dir.join(METADATA_FILENAME);
    if !path.is_file() {
        return None;
    }

    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_yaml::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

// ============================================================================
// Catalog types
// ============================================================================

/// A selectable variation of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogVariation {
    pub name: String,
    pub metadata: Option<VariationMetadata>,
}

/// A component with at least one variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogComponent {
    pub name: String,
    pub metadata: Option<ComponentMetadata>,
    /// Never empty.
    pub variations: Vec<CatalogVariation>,
}

/// A category and its components.
///
/// A category may be empty when none of its components has variations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCategory {
    pub name: String,
    pub components: Vec<CatalogComponent>,
}

/// One `(category, component, variation)` triple offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableVariation {
    pub category: String,
    pub name: String,
    pub variation: String,
    /// `category/name/variation`, annotated with the variation status when
    /// metadata marks it experimental.
    pub label: String,
}

/// Snapshot of the KB directory layout.
///
/// Always rescanned, never cached between prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KbCatalog {
    categories: Vec<CatalogCategory>,
}

impl KbCatalog {
    /// All categories, sorted by name.
    pub fn categories(&self) -> &[CatalogCategory] {
        &self.categories
    }

    /// Components of one category, or an empty slice for unknown categories.
    pub fn components(&self, category: &str) -> &[CatalogComponent] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.components.as_slice())
            .unwrap_or(&[])
    }

    /// Flatten the catalog into selectable triples, in catalog order.
    pub fn selectable(&self) -> Vec<SelectableVariation> {
        let mut out = Vec::new();
        for category in &self.categories {
            for component in &category.components {
                for variation in &component.variations {
                    let mut label =
                        format!("{}/{}/{}", category.name, component.name, variation.name);
                    if let Some(VariationStatus::Experimental) =
                        variation.metadata.as_ref().and_then(|m| m.status)
                    {
                        label.push_str(" (experimental)");
                    }
                    out.push(SelectableVariation {
                        category: category.name.clone(),
                        name: component.name.clone(),
                        variation: variation.name.clone(),
                        label,
                    });
                }
            }
        }
        out
    }

    /// Whether nothing is selectable.
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.components.is_empty())
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// Sorted names of the visible subdirectories of `dir`.
fn child_dirs(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden_entry(&name) || !entry.path().is_dir() {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Scan the guideline tree of the KB rooted at `kb_root`.
///
/// # Errors
///
/// Returns [`StitchError::InvalidKbRepository`] if `docs/guidelines` is
/// missing or unreadable. Unreadable subdirectories are logged and skipped.
pub fn scan_catalog(kb_root: &Path) -> Result<KbCatalog, StitchError> {
    let root = guidelines_root(kb_root);
    let category_names = child_dirs(&root).map_err(|e| {
        StitchError::invalid_repository(
            kb_root.display().to_string(),
            format!("cannot read {}: {}", root.display(), e),
        )
    })?;

    let mut categories = Vec::with_capacity(category_names.len());
    for category in category_names {
        let category_dir = root.join(&category);
        let mut components = Vec::new();

        for component in list_or_warn(&category_dir) {
            let component_dir = category_dir.join(&component);
            let variations: Vec<CatalogVariation> = list_or_warn(&component_dir)
                .into_iter()
                .map(|name| CatalogVariation {
                    metadata: load_metadata(&component_dir.join(&name)),
                    name,
                })
                .collect();

            if variations.is_empty() {
                tracing::debug!("Skipping {}/{}: no variations", category, component);
                continue;
            }

            components.push(CatalogComponent {
                metadata: load_metadata(&component_dir),
                name: component,
                variations,
            });
        }

        categories.push(CatalogCategory {
            name: category,
            components,
        });
    }

    let catalog = KbCatalog { categories };
    tracing::debug!(
        "Scanned {}: {} selectable variation(s)",
        root.display(),
        catalog.selectable().len()
    );
    Ok(catalog)
}

fn list_or_warn(dir: &Path) -> Vec<String> {
    child_dirs(dir).unwrap_or_else(|e| {
        tracing::warn!("Cannot read {}: {}", dir.display(), e);
        Vec::new()
    })
}
