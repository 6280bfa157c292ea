//! The selection reconciler: an explicit state machine editing a
//! [`StitchConfig`] against the KB catalog.
//!
//! ```text
//!            ┌──────────── Add / Remove / View ────────────┐
//!            v                                              │
//!   Idle ──(choose)──> Acting(action) ──────────────────────┘
//!                         │ Save            │ Exit
//!                         v                 v
//!                  Save(config)      confirm? ── no ──> Idle
//!                                           │ yes
//!                                           v
//!                                        Discard
//! ```
//!
//! Persistence is not done here. The caller decides what to do with the
//! returned [`ReconcileOutcome`].

use crate::catalog::scan_catalog;
use crate::config::{ComponentSelection, StitchConfig};
use crate::errors::StitchError;
use crate::prompt::{InputSource, Reporter};
use crate::repository::KbRepository;

pub const ACTION_PROMPT: &str = "What would you like to do?";
pub const ADD_PROMPT: &str = "Select components and variations to include:";
pub const REMOVE_PROMPT: &str = "Select components to remove:";
pub const EXIT_CONFIRM_PROMPT: &str = "Are you sure you want to exit without saving?";

/// A menu entry of the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    View,
    Save,
    Exit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 5] = [
        Action::Add,
        Action::Remove,
        Action::View,
        Action::Save,
        Action::Exit,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Action::Add => "Add new components",
            Action::Remove => "Remove components",
            Action::View => "View current configuration",
            Action::Save => "Save and exit",
            Action::Exit => "Exit without saving",
        }
    }
}

/// Terminal result of a reconcile session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The user chose to save; carries every accumulated mutation.
    Save(StitchConfig),
    /// The user confirmed exiting without saving.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Acting(Action),
}

/// Drives one edit session.
pub struct Reconciler<'a> {
    repo: &'a KbRepository,
    input: &'a mut dyn InputSource,
    reporter: &'a dyn Reporter,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        repo: &'a KbRepository,
        input: &'a mut dyn InputSource,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            repo,
            input,
            reporter,
        }
    }

    /// Run the state machine until Save or a confirmed Exit.
    ///
    /// # Errors
    ///
    /// Any failure (no selectable components, prompt cancellation, git or
    /// filesystem errors) ends the session; the configuration is dropped.
    pub fn run(mut self, mut config: StitchConfig) -> Result<ReconcileOutcome, StitchError> {
        let mut state = State::Idle;
        loop {
            state = match state {
                State::Idle => State::Acting(self.choose_action()?),
                State::Acting(Action::Add) => {
                    self.add(&mut config)?;
                    State::Idle
                }
                State::Acting(Action::Remove) => {
                    self.remove(&mut config)?;
                    State::Idle
                }
                State::Acting(Action::View) => {
                    self.view(&config);
                    State::Idle
                }
                State::Acting(Action::Save) => return Ok(ReconcileOutcome::Save(config)),
                State::Acting(Action::Exit) => {
                    if self.input.confirm(EXIT_CONFIRM_PROMPT, false)? {
                        return Ok(ReconcileOutcome::Discard);
                    }
                    State::Idle
                }
            };
        }
    }

    fn choose_action(&mut self) -> Result<Action, StitchError> {
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();
        let idx = self.input.select_one(ACTION_PROMPT, &labels)?;
        let action = Action::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| StitchError::Prompt(format!("No menu entry at index {}", idx)))?;
        tracing::debug!("Action = {:?}", action);
        Ok(action)
    }

    fn add(&mut self, config: &mut StitchConfig) -> Result<(), StitchError> {
        let catalog = scan_catalog(self.repo.root())?;
        let selectable = catalog.selectable();
        if selectable.is_empty() {
            return Err(StitchError::NoComponentsAvailable);
        }

        let labels: Vec<String> = selectable.iter().map(|s| s.label.clone()).collect();
        let picked = self.input.select_many(ADD_PROMPT, &labels)?;
        if picked.is_empty() {
            return Ok(());
        }

        let commit = self.repo.current_commit_hash()?;
        for idx in picked {
            let Some(choice) = selectable.get(idx) else {
                return Err(StitchError::Prompt(format!("No component at index {}", idx)));
            };
            let selection =
                ComponentSelection::stamped(&choice.category, &choice.name, &choice.variation, &commit);
            let added = selection.triple();

            match config.upsert(selection) {
                Some(old) => self
                    .reporter
                    .info(&format!("Replacing {} with {}", old.triple(), added)),
                None => self.reporter.success(&format!("Added {}", added)),
            }
        }
        Ok(())
    }

    fn remove(&mut self, config: &mut StitchConfig) -> Result<(), StitchError> {
        if config.components.is_empty() {
            self.reporter.info("No components to remove.");
            return Ok(());
        }

        let labels: Vec<String> = config.components.iter().map(|c| c.triple()).collect();
        let picked = self.input.select_many(REMOVE_PROMPT, &labels)?;
        let targets: Vec<ComponentSelection> = picked
            .iter()
            .filter_map(|&idx| config.components.get(idx).cloned())
            .collect();

        if config.remove_exact(&targets) > 0 {
            self.reporter.success("Components removed successfully.");
        } else {
            self.reporter.info("No components selected.");
        }
        Ok(())
    }

    fn view(&self, config: &StitchConfig) {
        if config.components.is_empty() {
            self.reporter.info("No components configured.");
            return;
        }

        self.reporter.info("Current configuration:");
        self.reporter
            .info(&format!("Repository: {}", config.kb.repository));
        self.reporter.info("Components:");
        for component in &config.components {
            self.reporter.info(&format!("- {}", component.triple()));
        }
    }
}
