use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{header, Client};

use crate::error::AppError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// A single GET that yields the body of a 2xx response.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<Bytes, AppError>> + Send;
}

/// Shared reqwest client; connection pooling is kept across requests.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Bytes, AppError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "{} returned status {}",
                url, status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {}", e)))
    }
}
