use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::feed::ImageRecord;

/// One page of the remote listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u64, limit: u32) -> Self {
        PageRequest { page, limit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure.
    Transport(String),
    /// Non-2xx response.
    Status(u16),
    /// Body was not a JSON array of image records.
    Decode(String),
    /// The source itself could not serve the request.
    Unavailable(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {}", msg),
            FetchError::Status(code) => write!(f, "unexpected status {}", code),
            FetchError::Decode(msg) => write!(f, "malformed page body: {}", msg),
            FetchError::Unavailable(msg) => write!(f, "source unavailable: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Paginated listing of image records. An empty page means there is nothing more.
pub trait PageSource: Send + Sync + 'static {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<ImageRecord>, FetchError>> + Send;
}
