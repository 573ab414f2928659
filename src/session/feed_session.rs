use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{ArrivalOrder, FeedConfig, IssuedPages};
use crate::cursor::PageCursor;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dom::{Document, Element, ElementId, Rect};
use crate::error::FeedError;
use crate::feed::{FetchOutcome, ImageFeed, ImageRecord};
use crate::journal::Journal;
use crate::lazy_image::lazy_image_callback;
use crate::notify::{FeedNotifier, FETCH_ENDED, FETCH_STARTED, PAGE_ADVANCED, PAGE_APPENDED};
use crate::reducer::Reducer;
use crate::source::{FetchError, PageRequest, PageSource};
use crate::visibility::{VisibilityScheduler, WatchMode};

#[derive(Serialize)]
struct PagePayload {
    page: u64,
}

#[derive(Serialize)]
struct AppendedPayload {
    page: u64,
    appended: usize,
    total: usize,
}

#[derive(Serialize)]
struct EndedPayload {
    page: u64,
    outcome: FetchOutcome,
}

/// Everything the reducers own, behind one lock.
struct FeedStore {
    cursor: PageCursor,
    feed: ImageFeed,
    issued: IssuedPages,
    order: ArrivalOrder,
    /// How many feed records already have an image element.
    mounted: usize,
    notifier: FeedNotifier,
}

impl FeedStore {
    fn new() -> Self {
        FeedStore {
            cursor: PageCursor::new(),
            feed: ImageFeed::new(),
            issued: IssuedPages::new(),
            order: ArrivalOrder::new(),
            mounted: 0,
            notifier: FeedNotifier::new(),
        }
    }
}

// Lock order: scheduler, document, store, then sentinel or tasks.
struct SessionInner<S> {
    config: FeedConfig,
    source: Arc<S>,
    store: Mutex<FeedStore>,
    document: Mutex<Document>,
    scheduler: Mutex<VisibilityScheduler>,
    sentinel: Mutex<Option<ElementId>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    diagnostics: Diagnostics,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, operation: &'static str) -> Result<MutexGuard<'a, T>, FeedError> {
    mutex.lock().map_err(|_| FeedError::LockPoisoned(operation))
}

fn current_runtime() -> Result<Handle, FeedError> {
    Handle::try_current().map_err(|e| FeedError::Runtime(e.to_string()))
}

impl<S: PageSource> SessionInner<S> {
    /// Sentinel-advance: one page step, then the fetch derived from the new page.
    ///
    /// Without a runtime the page is left where it is, so no page goes unfetched.
    fn advance(self: &Arc<Self>) -> Result<u64, FeedError> {
        let runtime = current_runtime()?;
        let page = {
            let mut store = lock(&self.store, "advance")?;
            let page = store.cursor.advance()?;
            store.notifier.enqueue_with(PAGE_ADVANCED, &PagePayload { page });
            store.notifier.emit_queued();
            page
        };
        self.issue_fetch(&runtime)?;
        Ok(page)
    }

    /// Issue the fetch for the current page unless that page was already issued.
    fn issue_fetch(self: &Arc<Self>, runtime: &Handle) -> Result<(), FeedError> {
        let request = {
            let mut store = lock(&self.store, "issue fetch")?;
            let page = store.cursor.page();
            if !store.issued.claim(page) {
                log::debug!("page {} already issued, not fetching again", page);
                return Ok(());
            }
            store.feed.begin_fetch(page)?;
            store.order.expect(page);
            store.notifier.enqueue_with(FETCH_STARTED, &PagePayload { page });
            store.notifier.emit_queued();
            PageRequest::new(page, self.config.page_size)
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let source = Arc::clone(&self.source);
        let handle = runtime.spawn(async move {
            let result = source.fetch_page(request).await;
            match weak.upgrade() {
                Some(inner) => {
                    if let Err(err) = inner.complete_fetch(request, result) {
                        log::error!("page {} could not be applied: {}", request.page, err);
                    }
                }
                None => log::debug!(
                    "session torn down before page {} resolved, discarding result",
                    request.page
                ),
            }
        });

        let mut tasks = lock(&self.tasks, "track fetch")?;
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
        Ok(())
    }

    /// Hand a resolved page to the feed. Pages are applied in the order they were
    /// issued; one that resolves early is held until the pages before it have.
    fn complete_fetch(
        &self,
        request: PageRequest,
        result: Result<Vec<ImageRecord>, FetchError>,
    ) -> Result<(), FeedError> {
        let halt = {
            let mut store = lock(&self.store, "complete fetch")?;
            let ready = store.order.arrive(request.page, result);
            if ready.is_empty() {
                log::debug!("page {} resolved early, holding it", request.page);
            }

            let mut halt = false;
            for (page, result) in ready {
                let outcome = self.apply_page(&mut store, page, result)?;
                halt |= outcome == FetchOutcome::Empty && self.config.halt_on_empty_page;
            }
            store.notifier.emit_queued();
            halt
        };

        if halt {
            self.halt_sentinel()?;
        }
        Ok(())
    }

    /// Append (or fail) one page and always close its fetch.
    fn apply_page(
        &self,
        store: &mut FeedStore,
        page: u64,
        result: Result<Vec<ImageRecord>, FetchError>,
    ) -> Result<FetchOutcome, FeedError> {
        let outcome = match result {
            Ok(records) => {
                let appended = records.len();
                match store.feed.append_page(page, records) {
                    Ok(()) => {
                        let total = store.feed.len();
                        store.notifier.enqueue_with(
                            PAGE_APPENDED,
                            &AppendedPayload {
                                page,
                                appended,
                                total,
                            },
                        );
                        if appended == 0 {
                            FetchOutcome::Empty
                        } else {
                            FetchOutcome::Loaded
                        }
                    }
                    Err(error) => {
                        self.diagnostics
                            .record(Diagnostic::PageRejected { page, error });
                        FetchOutcome::Failed
                    }
                }
            }
            Err(error) => {
                self.diagnostics
                    .record(Diagnostic::FetchFailed { page, error });
                FetchOutcome::Failed
            }
        };
        store.feed.end_fetch(page, outcome)?;
        store
            .notifier
            .enqueue_with(FETCH_ENDED, &EndedPayload { page, outcome });
        Ok(outcome)
    }

    fn halt_sentinel(&self) -> Result<(), FeedError> {
        let sentinel = *lock(&self.sentinel, "halt")?;
        if let Some(id) = sentinel {
            if lock(&self.scheduler, "halt")?.detach(id) {
                log::info!("listing exhausted, sentinel {} no longer watched", id);
            }
        }
        Ok(())
    }
}

/// One infinite-scroll session: page cursor, image feed, and the visibility
/// watches that drive them.
///
/// Must be used from inside a Tokio runtime; fetches run as spawned tasks that
/// hold only a weak reference back to the session.
pub struct FeedSession<S> {
    inner: Arc<SessionInner<S>>,
}

impl<S: PageSource> FeedSession<S> {
    pub fn new(config: FeedConfig, source: S) -> Result<Self, FeedError> {
        config.validate()?;
        Ok(FeedSession {
            inner: Arc::new(SessionInner {
                config,
                source: Arc::new(source),
                store: Mutex::new(FeedStore::new()),
                document: Mutex::new(Document::new()),
                scheduler: Mutex::new(VisibilityScheduler::new()),
                sentinel: Mutex::new(None),
                tasks: Mutex::new(Vec::new()),
                diagnostics: Diagnostics::new(),
            }),
        })
    }

    /// Mount the bottom sentinel and fetch the initial page.
    ///
    /// Mounting again returns the existing sentinel and issues nothing.
    pub fn mount(&self, sentinel_bounds: Rect) -> Result<ElementId, FeedError> {
        let runtime = current_runtime()?;
        let sentinel = {
            let mut scheduler = lock(&self.inner.scheduler, "mount")?;
            let mut document = lock(&self.inner.document, "mount")?;
            let mut sentinel = lock(&self.inner.sentinel, "mount")?;
            if let Some(existing) = *sentinel {
                return Ok(existing);
            }

            let id = document.mount_sentinel(sentinel_bounds);
            let weak = Arc::downgrade(&self.inner);
            scheduler.attach(id, WatchMode::Repeating, move |_: &mut Element| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = inner.advance() {
                    log::error!("sentinel could not advance the page: {}", err);
                }
            });
            *sentinel = Some(id);
            id
        };

        self.inner.issue_fetch(&runtime)?;
        Ok(sentinel)
    }

    /// Create and watch image elements for records appended since the last call.
    ///
    /// `layout` receives each record with its position in the feed and returns its box.
    pub fn mount_new_cards<L>(&self, mut layout: L) -> Result<Vec<ElementId>, FeedError>
    where
        L: FnMut(usize, &ImageRecord) -> Rect,
    {
        let (start, fresh) = {
            let mut store = lock(&self.inner.store, "mount cards")?;
            let start = store.mounted;
            let fresh = store.feed.images()[start..].to_vec();
            store.mounted = store.feed.len();
            (start, fresh)
        };
        if fresh.is_empty() {
            return Ok(Vec::new());
        }

        let mut scheduler = lock(&self.inner.scheduler, "mount cards")?;
        let mut document = lock(&self.inner.document, "mount cards")?;
        let mut mounted = Vec::with_capacity(fresh.len());
        for (offset, record) in fresh.iter().enumerate() {
            let bounds = layout(start + offset, record);
            let id = document.mount_image(
                bounds,
                &self.inner.config.placeholder_src,
                Some(record.full_url.clone()),
                &record.id,
            );
            scheduler.attach(
                id,
                WatchMode::OneShot,
                lazy_image_callback(self.inner.diagnostics.clone()),
            );
            mounted.push(id);
        }
        Ok(mounted)
    }

    /// Run one visibility pass for the viewport `root`. Returns how many watches fired.
    pub fn handle_viewport(&self, root: Rect) -> Result<usize, FeedError> {
        let mut scheduler = lock(&self.inner.scheduler, "deliver")?;
        let mut document = lock(&self.inner.document, "deliver")?;
        Ok(scheduler.deliver(&mut document, root))
    }

    /// Move an element after layout. False if it is not mounted.
    pub fn set_bounds(&self, id: ElementId, bounds: Rect) -> Result<bool, FeedError> {
        let mut document = lock(&self.inner.document, "set bounds")?;
        Ok(match document.get_mut(id) {
            Some(element) => {
                element.set_bounds(bounds);
                true
            }
            None => false,
        })
    }

    /// Discard an element and its watch.
    pub fn remove_element(&self, id: ElementId) -> Result<Option<Element>, FeedError> {
        let mut scheduler = lock(&self.inner.scheduler, "remove element")?;
        let mut document = lock(&self.inner.document, "remove element")?;
        scheduler.detach(id);
        let removed = document.remove(id);
        let mut sentinel = lock(&self.inner.sentinel, "remove element")?;
        if *sentinel == Some(id) {
            *sentinel = None;
        }
        Ok(removed)
    }

    /// Subscribe to change notifications (see [`crate::notify`]).
    pub fn on<F>(&self, event: &str, listener: F) -> Result<(), FeedError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        lock(&self.inner.store, "subscribe")?.notifier.on(event, listener);
        Ok(())
    }

    /// Wait until every fetch issued so far has resolved.
    pub async fn settle(&self) -> Result<(), FeedError> {
        loop {
            let pending: Vec<JoinHandle<()>> = {
                let mut tasks = lock(&self.inner.tasks, "settle")?;
                tasks.drain(..).collect()
            };
            if pending.is_empty() {
                return Ok(());
            }
            for task in pending {
                if let Err(err) = task.await {
                    log::warn!("fetch task did not complete: {}", err);
                }
            }
        }
    }

    /// Detach every watch and drop all session state.
    ///
    /// Fetches still in flight resolve into nothing.
    pub fn unmount(self) -> Result<(), FeedError> {
        self.teardown()
    }

    fn teardown(&self) -> Result<(), FeedError> {
        lock(&self.inner.scheduler, "unmount")?.detach_all();
        lock(&self.inner.document, "unmount")?.clear();
        *lock(&self.inner.sentinel, "unmount")? = None;
        Ok(())
    }

    pub fn config(&self) -> &FeedConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.inner.diagnostics
    }

    pub fn sentinel(&self) -> Result<Option<ElementId>, FeedError> {
        Ok(*lock(&self.inner.sentinel, "read sentinel")?)
    }

    pub fn page(&self) -> Result<u64, FeedError> {
        Ok(lock(&self.inner.store, "read page")?.cursor.page())
    }

    pub fn images(&self) -> Result<Vec<ImageRecord>, FeedError> {
        Ok(lock(&self.inner.store, "read images")?.feed.images().to_vec())
    }

    pub fn image_count(&self) -> Result<usize, FeedError> {
        Ok(lock(&self.inner.store, "read images")?.feed.len())
    }

    pub fn is_fetching(&self) -> Result<bool, FeedError> {
        Ok(lock(&self.inner.store, "read fetching")?.feed.is_fetching())
    }

    pub fn is_exhausted(&self) -> Result<bool, FeedError> {
        Ok(lock(&self.inner.store, "read exhausted")?.feed.is_exhausted())
    }

    pub fn failed_pages(&self) -> Result<Vec<u64>, FeedError> {
        Ok(lock(&self.inner.store, "read failed pages")?
            .feed
            .failed_pages()
            .to_vec())
    }

    pub fn element(&self, id: ElementId) -> Result<Option<Element>, FeedError> {
        Ok(lock(&self.inner.document, "read element")?.get(id).cloned())
    }

    pub fn watched(&self, mode: WatchMode) -> Result<usize, FeedError> {
        Ok(lock(&self.inner.scheduler, "read watches")?.attached_count(mode))
    }

    pub fn cursor_journal(&self) -> Result<Journal, FeedError> {
        Ok(lock(&self.inner.store, "read journal")?.cursor.journal().clone())
    }

    pub fn feed_journal(&self) -> Result<Journal, FeedError> {
        Ok(lock(&self.inner.store, "read journal")?.feed.journal().clone())
    }
}
