#[cfg(feature = "http")]
mod http;
mod in_memory;
mod page_source;

#[cfg(feature = "http")]
pub use http::HttpPageSource;
pub use in_memory::InMemoryPageSource;
pub use page_source::{FetchError, PageRequest, PageSource};
