use serde::{Deserialize, Serialize};

/// One image as listed by the remote source. Immutable once received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub author: String,
    /// Full-resolution image URL, swapped in when the card becomes visible.
    #[serde(rename = "download_url")]
    pub full_url: String,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, author: impl Into<String>, full_url: impl Into<String>) -> Self {
        ImageRecord {
            id: id.into(),
            author: author.into(),
            full_url: full_url.into(),
        }
    }
}
