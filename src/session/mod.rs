mod config;
mod feed_session;
mod fetch_guard;

pub use config::{FeedConfig, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, DEFAULT_PLACEHOLDER};
pub use feed_session::FeedSession;
pub use fetch_guard::{ArrivalOrder, IssuedPages};
