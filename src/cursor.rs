//! Page counter advanced once per "reached bottom" event.

use serde::{Deserialize, Serialize};

use crate::journal::{Journal, PayloadError};
use crate::reducer::{Action, Reducer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorAction {
    Advance,
}

impl Action for CursorAction {
    fn name(&self) -> &'static str {
        match self {
            CursorAction::Advance => "Advance",
        }
    }
}

/// Monotonic page counter starting at 0.
///
/// Has no flow control of its own: every accepted advance is one increment, and
/// deduplicating the fetch that follows is the session's job.
#[derive(Debug)]
pub struct PageCursor {
    journal: Journal,
    page: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        PageCursor {
            journal: Journal::with_id("page-cursor"),
            page: 0,
        }
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Move to the next page and return it.
    pub fn advance(&mut self) -> Result<u64, PayloadError> {
        self.dispatch(CursorAction::Advance)?;
        Ok(self.page)
    }
}

impl Reducer for PageCursor {
    type Action = CursorAction;

    fn journal(&self) -> &Journal {
        &self.journal
    }

    fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    fn reduce(&mut self, action: &CursorAction) {
        match action {
            CursorAction::Advance => self.page += 1,
        }
    }
}
