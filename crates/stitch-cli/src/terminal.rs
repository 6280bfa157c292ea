//! Terminal implementations of the core interaction capabilities.
//!
//! [`TerminalInput`] renders prompts with `inquire`; [`ConsoleReporter`]
//! prints notices with the CLI [`Style`].

use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use stitch_core::{InputSource, NoticeKind, Reporter, StitchError};

use crate::ui::{MessageType, Style};

const PAGE_SIZE: usize = 20;

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn select_one(&mut self, message: &str, choices: &[String]) -> Result<usize, StitchError> {
        Select::new(message, choices.to_vec())
            .with_page_size(PAGE_SIZE)
            .raw_prompt()
            .map(|picked| picked.index)
            .map_err(prompt_error)
    }

    fn select_many(
        &mut self,
        message: &str,
        choices: &[String],
    ) -> Result<Vec<usize>, StitchError> {
        let picked = MultiSelect::new(message, choices.to_vec())
            .with_page_size(PAGE_SIZE)
            .raw_prompt()
            .map_err(prompt_error)?;
        let mut indices: Vec<usize> = picked.into_iter().map(|o| o.index).collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, StitchError> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn get_text(&mut self, message: &str) -> Result<String, StitchError> {
        Text::new(message).prompt().map_err(prompt_error)
    }
}

fn prompt_error(err: InquireError) -> StitchError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            StitchError::PromptCancelled
        }
        InquireError::NotTTY => StitchError::Prompt("input is not a terminal".to_string()),
        other => StitchError::Prompt(other.to_string()),
    }
}

/// Prints core notices to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    style: Style,
}

impl ConsoleReporter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, kind: NoticeKind, message: &str) {
        let msg_type = match kind {
            NoticeKind::Info => MessageType::Info,
            NoticeKind::Success => MessageType::Ok,
            NoticeKind::Warning => MessageType::Warn,
        };
        println!("{}", self.style.message(msg_type, message));
    }
}
