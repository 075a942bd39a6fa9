use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::constants::BROWSER_USER_AGENT;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

/// Build the HTTP client shared by the fetcher and the notifier.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
}

/// Source of the listing page document.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the raw listing document.
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Fetches the listing page over HTTP.
#[derive(Debug, Clone)]
pub struct ListingFetcher {
    client: Client,
    url: Url,
}

impl ListingFetcher {
    #[must_use]
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ListingSource for ListingFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "Fetching listing page");

        let request_error = |source| FetchError::Request {
            url: self.url.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(request_error)?;
        debug!(bytes = body.len(), "Fetched listing page");
        Ok(body)
    }
}
