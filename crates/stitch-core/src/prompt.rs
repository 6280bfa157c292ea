//! Interaction capabilities used by the init flow.
//!
//! The reconciler never talks to a terminal. It asks an [`InputSource`] for
//! answers and tells a [`Reporter`] what happened. The CLI provides terminal
//! implementations; `crate::testing` (feature `testing`) provides scripted ones.

use crate::errors::StitchError;

/// Source of user answers.
///
/// Choices are passed as display labels and answered by index, so
/// implementations never need to know the domain types behind them.
pub trait InputSource {
    /// Pick exactly one of `choices`. Returns its index.
    fn select_one(&mut self, message: &str, choices: &[String]) -> Result<usize, StitchError>;

    /// Pick any subset of `choices`, possibly empty. Returns indices in
    /// ascending order.
    fn select_many(&mut self, message: &str, choices: &[String])
        -> Result<Vec<usize>, StitchError>;

    /// Yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, StitchError>;

    /// Free-form text.
    fn get_text(&mut self, message: &str) -> Result<String, StitchError>;
}

/// Category of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information (listings, headings).
    Info,
    /// Something completed.
    Success,
    /// Something the user should notice but that is not an error.
    Warning,
}

/// Sink for user-facing notices.
///
/// Distinct from tracing: these are the messages a user reads during a normal
/// run, not diagnostics.
pub trait Reporter {
    /// Emit one notice.
    fn report(&self, kind: NoticeKind, message: &str);

    fn info(&self, message: &str) {
        self.report(NoticeKind::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(NoticeKind::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(NoticeKind::Warning, message);
    }
}
