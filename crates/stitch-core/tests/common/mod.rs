//! Shared fixtures for stitch-core integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub const WORKFLOW_TEMPLATE: &str = "\
# Workflow

{{#categories}}
## {{name}}
{{#components}}
- [{{name}}]({{relative_path}})
{{/components}}
{{/categories}}
{{^categories}}
No guidelines synced.
{{/categories}}
";

/// A KB repository and an empty project directory under one temp root.
pub struct Fixture {
    pub temp: TempDir,
    pub kb: PathBuf,
    pub project: PathBuf,
}

impl Fixture {
    /// Build the standard KB layout without running git.
    ///
    /// A bare `.git` directory marks it as a checkout; pair it with `StaticGit`.
    pub fn new() -> Self {
        let fixture = Self::layout();
        fs::create_dir_all(fixture.kb.join(".git")).unwrap();
        fixture
    }

    /// Build the standard KB layout as a real git repository on `branch`.
    ///
    /// Returns `None` when `git` is not available.
    pub fn with_git(branch: &str) -> Option<Self> {
        if !git_available() {
            return None;
        }
        let fixture = Self::layout();
        let kb = &fixture.kb;
        git(kb, &["init", "-q"]);
        git(kb, &["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)]);
        git(kb, &["config", "user.name", "Test User"]);
        git(kb, &["config", "user.email", "test@example.com"]);
        git(kb, &["add", "."]);
        git(kb, &["commit", "-q", "-m", "Initial commit"]);
        Some(fixture)
    }

    fn layout() -> Self {
        let temp = TempDir::new().unwrap();
        let kb = temp.path().join("mock-kb");
        let project = temp.path().join("test-project");
        let guidelines = kb.join("docs/guidelines");

        write(
            &guidelines.join("tech-stack/nestjs/default/nestjs-structure.md"),
            "# NestJS structure (default)\n",
        );
        write(
            &guidelines.join("tech-stack/nestjs/exp1/nestjs-structure.md"),
            "# NestJS structure (exp1)\n",
        );
        write(
            &guidelines.join("tech-stack/nestjs/exp1/metadata.yaml"),
            "name: exp1\nstatus: experimental\n",
        );
        write(
            &guidelines.join("tech-stack/typescript/default/typescript.md"),
            "# TypeScript\n",
        );
        write(
            &guidelines.join("ai-tools/workflow.md.mustache"),
            WORKFLOW_TEMPLATE,
        );
        write(&kb.join("docs/templates/adr.md"), "# ADR template\n");

        fs::create_dir_all(&project).unwrap();
        Self { temp, kb, project }
    }

    /// Commit hash of the KB's HEAD, via the git binary.
    pub fn head(&self) -> String {
        let out = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(&self.kb)
            .output()
            .unwrap();
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    /// `file://` URL of the KB, usable as a remote reference.
    pub fn kb_url(&self) -> String {
        format!("file://{}", self.kb.display())
    }

    pub fn kb_str(&self) -> String {
        self.kb.to_string_lossy().into_owned()
    }

    pub fn project_file(&self, relative: &str) -> PathBuf {
        self.project.join(relative)
    }
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
