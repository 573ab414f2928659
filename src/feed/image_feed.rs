use serde::{Deserialize, Serialize};

use super::ImageRecord;
use crate::journal::{Journal, PayloadError};
use crate::reducer::{Action, Reducer};

/// How a page fetch resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
    Loaded,
    Empty,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeedAction {
    BeginFetch { page: u64 },
    AppendPage { page: u64, records: Vec<ImageRecord> },
    EndFetch { page: u64, outcome: FetchOutcome },
}

impl Action for FeedAction {
    fn name(&self) -> &'static str {
        match self {
            FeedAction::BeginFetch { .. } => "BeginFetch",
            FeedAction::AppendPage { .. } => "AppendPage",
            FeedAction::EndFetch { .. } => "EndFetch",
        }
    }
}

/// Accumulated, append-only list of images plus the fetching flag.
#[derive(Debug)]
pub struct ImageFeed {
    journal: Journal,
    images: Vec<ImageRecord>,
    in_flight: u32,
    exhausted: bool,
    failed_pages: Vec<u64>,
    #[cfg(test)]
    reject_next_append: bool,
}

impl Default for ImageFeed {
    fn default() -> Self {
        ImageFeed {
            journal: Journal::with_id("image-feed"),
            images: Vec::new(),
            in_flight: 0,
            exhausted: false,
            failed_pages: Vec::new(),
            #[cfg(test)]
            reject_next_append: false,
        }
    }
}

impl ImageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// True from `BeginFetch` until the matching `EndFetch` of the last outstanding request.
    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// The most recent successful fetch returned no records.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Pages whose fetch failed. They are not retried.
    pub fn failed_pages(&self) -> &[u64] {
        &self.failed_pages
    }

    pub fn begin_fetch(&mut self, page: u64) -> Result<(), PayloadError> {
        self.dispatch(FeedAction::BeginFetch { page })
    }

    pub fn append_page(&mut self, page: u64, records: Vec<ImageRecord>) -> Result<(), PayloadError> {
        #[cfg(test)]
        if std::mem::take(&mut self.reject_next_append) {
            return Err(PayloadError {
                message: format!("page {} rejected", page),
            });
        }
        self.dispatch(FeedAction::AppendPage { page, records })
    }

    /// Make the next `append_page` fail before it is journaled.
    #[cfg(test)]
    pub(crate) fn reject_next_append(&mut self) {
        self.reject_next_append = true;
    }

    pub fn end_fetch(&mut self, page: u64, outcome: FetchOutcome) -> Result<(), PayloadError> {
        self.dispatch(FeedAction::EndFetch { page, outcome })
    }
}

impl Reducer for ImageFeed {
    type Action = FeedAction;

    fn journal(&self) -> &Journal {
        &self.journal
    }

    fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    fn reduce(&mut self, action: &FeedAction) {
        match action {
            FeedAction::BeginFetch { .. } => {
                self.in_flight += 1;
            }
            FeedAction::AppendPage { records, .. } => {
                self.images.extend(records.iter().cloned());
            }
            FeedAction::EndFetch { page, outcome } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match outcome {
                    FetchOutcome::Loaded => self.exhausted = false,
                    FetchOutcome::Empty => self.exhausted = true,
                    FetchOutcome::Failed => self.failed_pages.push(*page),
                }
            }
        }
    }
}
