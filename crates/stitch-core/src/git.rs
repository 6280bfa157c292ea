//! Git plumbing used by the repository accessor.
//!
//! Only two operations are needed: a shallow single-branch clone and reading
//! the HEAD commit. They sit behind [`GitClient`] so tests can substitute a
//! client that never touches the network.

use std::fmt::Debug;
use std::path::Path;
use std::process::Command;

use crate::errors::GitError;

/// Git operations required by stitch.
pub trait GitClient: Debug + Send + Sync {
    /// Clone `url` into `dest` with `--depth 1 --single-branch --branch <branch>`.
    ///
    /// `dest` must not exist yet.
    fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<(), GitError>;

    /// Return the commit hash `HEAD` points to in `repo_dir`.
    fn head_commit(&self, repo_dir: &Path) -> Result<String, GitError>;
}

/// [`GitClient`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!("Running `{}`", command);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitClient for SystemGit {
    fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<(), GitError> {
        let dest_str = dest.to_string_lossy();
        self.run(
            &[
                "clone",
                "--depth",
                "1",
                "--single-branch",
                "--branch",
                branch,
                url,
                dest_str.as_ref(),
            ],
            None,
        )
        .map(|_| ())
    }

    fn head_commit(&self, repo_dir: &Path) -> Result<String, GitError> {
        self.run(&["rev-parse", "HEAD"], Some(repo_dir))
    }
}
