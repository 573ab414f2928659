use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use super::{FetchError, PageRequest, PageSource};
use crate::feed::ImageRecord;

type PageResult = Result<Vec<ImageRecord>, FetchError>;

/// Scripted page source. Pages that were never scripted come back empty.
///
/// Clones share the same script and request log. A gated source holds every
/// fetch until [`InMemoryPageSource::release`] hands out permits.
#[derive(Clone, Default)]
pub struct InMemoryPageSource {
    pages: Arc<Mutex<HashMap<u64, PageResult>>>,
    requests: Arc<Mutex<Vec<PageRequest>>>,
    gate: Option<Arc<Semaphore>>,
}

impl InMemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        InMemoryPageSource {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    pub fn with_page(self, page: u64, records: Vec<ImageRecord>) -> Self {
        self.script(page, Ok(records));
        self
    }

    pub fn with_failure(self, page: u64, error: FetchError) -> Self {
        self.script(page, Err(error));
        self
    }

    pub fn script(&self, page: u64, result: PageResult) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(page, result);
        }
    }

    /// Let `count` held fetches proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl PageSource for InMemoryPageSource {
    fn fetch_page(&self, request: PageRequest) -> impl Future<Output = PageResult> + Send {
        let pages = Arc::clone(&self.pages);
        let requests = Arc::clone(&self.requests);
        let gate = self.gate.clone();

        async move {
            requests
                .lock()
                .map_err(|_| FetchError::Unavailable("request log poisoned".into()))?
                .push(request);

            if let Some(gate) = gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| FetchError::Unavailable(e.to_string()))?;
                permit.forget();
            }

            let pages = pages
                .lock()
                .map_err(|_| FetchError::Unavailable("page script poisoned".into()))?;
            match pages.get(&request.page) {
                Some(Ok(records)) => Ok(records
                    .iter()
                    .take(request.limit as usize)
                    .cloned()
                    .collect()),
                Some(Err(err)) => Err(err.clone()),
                None => Ok(Vec::new()),
            }
        }
    }
}
