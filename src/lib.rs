//! Visibility-driven infinite scroll and lazy image loading.
//!
//! A [`FeedSession`] ties together three small state machines:
//!
//! - [`PageCursor`]: a page counter advanced once per sentinel intersection.
//! - [`ImageFeed`]: the append-only list of [`ImageRecord`]s plus the fetching flag.
//! - [`VisibilityScheduler`]: keyed watches that fire when an element enters the viewport,
//!   repeating for the bottom sentinel and one-shot for each lazy image.
//!
//! Both reducers change only by dispatching named actions, which are journaled and
//! can be replayed with [`hydrate`].

mod cursor;
mod diagnostics;
mod error;
mod reducer;

pub mod dom;
pub mod feed;
pub mod journal;
pub mod lazy_image;
pub mod notify;
pub mod session;
pub mod source;
pub mod visibility;

pub use cursor::{CursorAction, PageCursor};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use dom::{Document, Element, ElementId, ElementKind, Rect};
pub use error::FeedError;
pub use feed::{FeedAction, FetchOutcome, ImageFeed, ImageRecord};
pub use journal::{ActionRecord, Journal, PayloadError};
pub use lazy_image::{lazy_image_callback, swap_in_source, SwapOutcome};
pub use notify::{FeedEvent, FeedNotifier};
pub use reducer::{hydrate, Action, Reducer};
pub use session::{ArrivalOrder, FeedConfig, FeedSession, IssuedPages};
#[cfg(feature = "http")]
pub use source::HttpPageSource;
pub use source::{FetchError, InMemoryPageSource, PageRequest, PageSource};
pub use visibility::{ObservationHandle, VisibilityScheduler, WatchMode};
