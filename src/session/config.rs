use serde::{Deserialize, Serialize};

use crate::error::FeedError;

pub const DEFAULT_ENDPOINT: &str = "https://picsum.photos/v2/list";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PLACEHOLDER: &str = "https://picsum.photos/id/870/300/300?grayscale&blur=2";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Listing URL; `page` and `limit` are sent as query parameters.
    pub endpoint: String,
    pub page_size: u32,
    /// Cheap source every card renders until it scrolls into view.
    pub placeholder_src: String,
    /// Stop watching the sentinel once a page comes back empty.
    pub halt_on_empty_page: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_src: DEFAULT_PLACEHOLDER.to_string(),
            halt_on_empty_page: false,
        }
    }
}

impl FeedConfig {
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        let config: FeedConfig =
            serde_json::from_str(json).map_err(|e| FeedError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        if self.page_size == 0 {
            return Err(FeedError::Config("page_size must be at least 1".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(FeedError::Config("endpoint must not be empty".into()));
        }
        if self.placeholder_src.trim().is_empty() {
            return Err(FeedError::Config("placeholder_src must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(!config.halt_on_empty_page);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = FeedConfig::from_json(r#"{ "page_size": 25, "halt_on_empty_page": true }"#)
            .unwrap();
        assert_eq!(config.page_size, 25);
        assert!(config.halt_on_empty_page);
        assert_eq!(config.placeholder_src, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = FeedConfig::from_json(r#"{ "page_size": 0 }"#).unwrap_err();
        assert_eq!(err, FeedError::Config("page_size must be at least 1".into()));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            FeedConfig::from_json("{ nope"),
            Err(FeedError::Config(_))
        ));
    }
}
