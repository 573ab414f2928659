use std::collections::{HashMap, VecDeque};

use crate::feed::ImageRecord;
use crate::source::FetchError;

type PageResult = Result<Vec<ImageRecord>, FetchError>;

/// Remembers the highest page a fetch was issued for.
///
/// A page is claimable once: re-renders, repeated effects or a late duplicate
/// never issue a second fetch for the same page, and failed pages stay claimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IssuedPages {
    highest: Option<u64>,
}

impl IssuedPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `page` for a fetch. False if it, or a later page, was already issued.
    pub fn claim(&mut self, page: u64) -> bool {
        match self.highest {
            Some(highest) if page <= highest => false,
            _ => {
                self.highest = Some(page);
                true
            }
        }
    }

    pub fn highest(&self) -> Option<u64> {
        self.highest
    }
}

/// Releases fetched pages in the order they were issued.
///
/// A page that resolves while an earlier one is still outstanding is held back
/// until everything before it has resolved. Failures count as resolved.
#[derive(Debug, Default)]
pub struct ArrivalOrder {
    awaiting: VecDeque<u64>,
    arrived: HashMap<u64, PageResult>,
}

impl ArrivalOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&mut self, page: u64) {
        self.awaiting.push_back(page);
    }

    /// Record that `page` resolved and return every page now ready, in issue order.
    pub fn arrive(&mut self, page: u64, result: PageResult) -> Vec<(u64, PageResult)> {
        if !self.awaiting.contains(&page) {
            log::warn!("page {} resolved but was never issued, ignoring", page);
            return Vec::new();
        }
        self.arrived.insert(page, result);

        let mut ready = Vec::new();
        while let Some(next) = self.awaiting.front().copied() {
            let Some(result) = self.arrived.remove(&next) else {
                break;
            };
            self.awaiting.pop_front();
            ready.push((next, result));
        }
        ready
    }

    /// Pages resolved but waiting on an earlier page.
    pub fn held(&self) -> usize {
        self.arrived.len()
    }

    /// Pages issued and not yet released.
    pub fn outstanding(&self) -> usize {
        self.awaiting.len()
    }
}
