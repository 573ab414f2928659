//! Page source backed by a JSON listing endpoint over HTTP.

use std::future::Future;

use super::{FetchError, PageRequest, PageSource};
use crate::feed::ImageRecord;
use crate::session::FeedConfig;

/// `GET {endpoint}?page={page}&limit={limit}` returning a JSON array of records.
#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPageSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        HttpPageSource {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<ImageRecord>, FetchError>> + Send {
        let call = self.client.get(&self.endpoint).query(&[
            ("page", request.page.to_string()),
            ("limit", request.limit.to_string()),
        ]);

        async move {
            let response = call
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            serde_json::from_slice::<Vec<ImageRecord>>(&body)
                .map_err(|e| FetchError::Decode(e.to_string()))
        }
    }
}
