use std::fmt;
use std::sync::{Arc, Mutex};

use crate::dom::ElementId;
use crate::journal::PayloadError;
use crate::source::FetchError;

/// Recoverable problems surfaced by the feed. None of them stop the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The page was requested but never arrived. It will not be requested again.
    FetchFailed { page: u64, error: FetchError },
    /// The page arrived but could not be journaled. It counts as failed.
    PageRejected { page: u64, error: PayloadError },
    /// An image became visible with no full-resolution URL; the placeholder stays.
    MissingImageSource { element: ElementId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FetchFailed { page, error } => {
                write!(f, "fetch for page {} failed: {}", page, error)
            }
            Diagnostic::PageRejected { page, error } => {
                write!(f, "page {} could not be applied: {}", page, error)
            }
            Diagnostic::MissingImageSource { element } => {
                write!(f, "image {} has no source to load, keeping placeholder", element)
            }
        }
    }
}

/// Shared diagnostic sink. Every entry is logged and kept for inspection.
#[derive(Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(_) => log::error!("diagnostic sink poisoned, dropping: {}", diagnostic),
        }
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let diagnostics = Diagnostics::new();
        let handle = diagnostics.clone();

        handle.record(Diagnostic::MissingImageSource {
            element: ElementId::new(4),
        });

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.entries()[0],
            Diagnostic::MissingImageSource {
                element: ElementId::new(4)
            }
        );
    }

    #[test]
    fn display() {
        let failed = Diagnostic::FetchFailed {
            page: 3,
            error: FetchError::Status(500),
        };
        assert_eq!(failed.to_string(), "fetch for page 3 failed: unexpected status 500");
    }
}
