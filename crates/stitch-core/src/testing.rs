//! Test doubles for the interaction and git capabilities.
//!
//! - [`ScriptedInput`]: answers prompts from a fixed script
//! - [`RecordingReporter`]: collects notices for assertions
//! - [`StaticGit`]: fixed commit hash, clones by copying a fixture directory
//!
//! Built for unit tests and behind the `testing` feature, so integration
//! tests and downstream tooling can drive the init flow without a terminal
//! or network while release builds leave the doubles out.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{GitError, StitchError};
use crate::fsutil::copy_dir_all;
use crate::git::GitClient;
use crate::prompt::{InputSource, NoticeKind, Reporter};

// ============================================================================
// ScriptedInput
// ============================================================================

/// One scripted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Answer a `select_one` with the choice whose label matches.
    Select(String),
    /// Answer a `select_many` with every choice whose label matches.
    SelectMany(Vec<String>),
    /// Answer a `confirm`.
    Confirm(bool),
    /// Answer a `get_text`.
    Text(String),
    /// Abort the prompt as if the user pressed Ctrl-C.
    Cancel,
}

impl Answer {
    pub fn select(label: impl Into<String>) -> Self {
        Self::Select(label.into())
    }

    pub fn select_many<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SelectMany(labels.into_iter().map(Into::into).collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// An [`InputSource`] replaying a fixed sequence of answers.
///
/// Labels match exactly, or as a prefix followed by a space so that
/// `tech-stack/nestjs/exp1` selects `tech-stack/nestjs/exp1 (experimental)`.
/// Running out of answers or meeting the wrong kind of answer is an error,
/// which keeps a broken script from looping forever.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedInput {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Prompt messages in the order they were asked.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    fn next(&mut self, message: &str) -> Result<Answer, StitchError> {
        self.asked.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Cancel) => Err(StitchError::PromptCancelled),
            Some(answer) => Ok(answer),
            None => Err(StitchError::Prompt(format!(
                "No more scripted answers (asked: {})",
                message
            ))),
        }
    }

    fn position(message: &str, choices: &[String], wanted: &str) -> Result<usize, StitchError> {
        choices
            .iter()
            .position(|label| label_matches(label, wanted))
            .ok_or_else(|| {
                StitchError::Prompt(format!(
                    "Scripted answer `{}` is not a choice of `{}`: {:?}",
                    wanted, message, choices
                ))
            })
    }
}

fn label_matches(label: &str, wanted: &str) -> bool {
    label == wanted
        || label
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(' '))
}

fn unexpected(message: &str, expected: &str, got: &Answer) -> StitchError {
    StitchError::Prompt(format!(
        "Expected a {} answer for `{}`, got {:?}",
        expected, message, got
    ))
}

impl InputSource for ScriptedInput {
    fn select_one(&mut self, message: &str, choices: &[String]) -> Result<usize, StitchError> {
        match self.next(message)? {
            Answer::Select(wanted) => Self::position(message, choices, &wanted),
            other => Err(unexpected(message, "select", &other)),
        }
    }

    fn select_many(
        &mut self,
        message: &str,
        choices: &[String],
    ) -> Result<Vec<usize>, StitchError> {
        match self.next(message)? {
            Answer::SelectMany(wanted) => {
                let mut indices = wanted
                    .iter()
                    .map(|w| Self::position(message, choices, w))
                    .collect::<Result<Vec<_>, _>>()?;
                indices.sort_unstable();
                indices.dedup();
                Ok(indices)
            }
            other => Err(unexpected(message, "multi-select", &other)),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool, StitchError> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(unexpected(message, "confirm", &other)),
        }
    }

    fn get_text(&mut self, message: &str) -> Result<String, StitchError> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            other => Err(unexpected(message, "text", &other)),
        }
    }
}

// ============================================================================
// RecordingReporter
// ============================================================================

/// A [`Reporter`] that stores every notice.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    notices: RefCell<Vec<(NoticeKind, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices in emission order.
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.borrow().clone()
    }

    /// Notice texts in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|(_, m)| m.clone()).collect()
    }

    /// Whether any notice contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.notices.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, kind: NoticeKind, message: &str) {
        self.notices.borrow_mut().push((kind, message.to_string()));
    }
}

// ============================================================================
// StaticGit
// ============================================================================

/// A [`GitClient`] that never runs git.
///
/// `head_commit` always returns the configured hash. `clone_shallow` copies
/// the clone fixture into the destination, unless the branch was marked as
/// failing or no fixture is set.
#[derive(Debug)]
pub struct StaticGit {
    commit: String,
    clone_fixture: Option<PathBuf>,
    failing_branches: Vec<String>,
    attempts: Mutex<Vec<String>>,
}

impl StaticGit {
    pub fn new(commit: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            clone_fixture: None,
            failing_branches: Vec::new(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Directory copied into the destination on a successful clone.
    pub fn with_clone_fixture(mut self, fixture: &Path) -> Self {
        self.clone_fixture = Some(fixture.to_path_buf());
        self
    }

    /// Make clones of `branch` fail.
    pub fn failing_branch(mut self, branch: impl Into<String>) -> Self {
        self.failing_branches.push(branch.into());
        self
    }

    /// Branches requested so far, in order.
    pub fn clone_attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

impl GitClient for StaticGit {
    fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<(), GitError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(branch.to_string());
        }

        let command = format!("git clone --branch {} {}", branch, url);
        let fixture = match &self.clone_fixture {
            Some(f) if !self.failing_branches.iter().any(|b| b == branch) => f,
            _ => {
                return Err(GitError::CommandFailed {
                    command,
                    stderr: format!("fatal: Remote branch {} not found in upstream origin", branch),
                })
            }
        };

        copy_dir_all(fixture, dest)
            .map(|_| ())
            .map_err(|e| GitError::CommandFailed {
                command,
                stderr: e.to_string(),
            })
    }

    fn head_commit(&self, _repo_dir: &Path) -> Result<String, GitError> {
        Ok(self.commit.clone())
    }
}
