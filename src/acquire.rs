//! Menu PDF acquisition.
//!
//! Best-effort, single-shot HTTP download with a per-provider timeout and no
//! retries. Failures come back typed; providers treat them the same as an
//! empty menu.

use crate::error::MenuError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::info;

/// Some sources (foodgarden.wien) reject the default reqwest agent, so the
/// acquirer always presents a browser user agent the way the sources expect.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Seam over the HTTP download so provider tests can substitute a stub.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, MenuError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, MenuError> {
        let client = Client::builder()
            // Avoid macOS system proxy lookup that can panic in sandboxed contexts.
            .no_proxy()
            .user_agent(USER_AGENT)
            .build()
            .map_err(MenuError::network)?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, MenuError> {
        info!(url, "downloading menu PDF");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(MenuError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MenuError::Network(format!("{url} returned {status}")));
        }

        let bytes = response.bytes().map_err(MenuError::network)?;
        Ok(bytes.to_vec())
    }
}
