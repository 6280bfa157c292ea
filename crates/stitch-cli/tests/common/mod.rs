//! Shared test utilities for stitch-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get a Command for the stitch binary with colors disabled.
///
/// # Panics
///
/// Panics if the stitch binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn stitch_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stitch").expect("stitch binary should exist");
    cmd.env("NO_COLOR", "1")
        .env_remove("STITCH_DEBUG")
        .env_remove("STITCH_KB_PATH")
        .env_remove("STITCH_PROJECT_DIR");
    cmd
}

/// A local knowledge base and an empty project directory.
pub struct Workspace {
    pub temp: TempDir,
    pub kb: PathBuf,
    pub project: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let kb = temp.path().join("kb");
        let project = temp.path().join("project");

        fs::create_dir_all(kb.join(".git")).expect("create .git");
        write(
            &kb.join("docs/guidelines/tech-stack/nestjs/default/nestjs-structure.md"),
            "# NestJS\n",
        );
        write(
            &kb.join("docs/guidelines/tech-stack/typescript/default/typescript.md"),
            "# TypeScript\n",
        );
        write(
            &kb.join("docs/guidelines/ai-tools/workflow.md.mustache"),
            "{{#categories}}\n## {{name}}\n{{#components}}\n- {{relative_path}}\n{{/components}}\n{{/categories}}\n",
        );
        fs::create_dir_all(&project).expect("create project dir");

        Self { temp, kb, project }
    }

    /// Write a stitch.yaml selecting `<category>/<name>/default` for each entry.
    pub fn write_config(&self, repository: &str, components: &[(&str, &str)]) {
        let mut yaml = format!("kb:\n  repository: {}\ncomponents:", repository);
        if components.is_empty() {
            yaml.push_str(" []\n");
        } else {
            yaml.push('\n');
            for (category, name) in components {
                yaml.push_str(&format!(
                    "  - category: {}\n    name: {}\n    variation: default\n    current_version: 1.0.0\n    checked_version: 1.0.0\n",
                    category, name
                ));
            }
        }
        write(&self.project.join("stitch.yaml"), &yaml);
    }
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}
