//! In-memory `Fetch` double shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use crate::error::AppError;
use crate::services::fetch::Fetch;

#[derive(Default)]
pub struct StubFetcher {
    responses: Mutex<HashMap<String, Result<Bytes, String>>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, body: impl Into<Bytes>) {
        self.responses.lock().unwrap().insert(url.to_string(), Ok(body.into()));
    }

    pub fn fail(&self, url: &str, error: &str) {
        self.responses.lock().unwrap().insert(url.to_string(), Err(error.to_string()));
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl Fetch for StubFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<Bytes, AppError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        match self.responses.lock().unwrap().get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(e)) => Err(AppError::HttpError(e.clone())),
            None => Err(AppError::HttpError(format!("{} returned status 404 Not Found", url))),
        }
    }
}
