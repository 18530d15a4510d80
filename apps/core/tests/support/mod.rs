use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use searxng_alfred_core::config::Config;
use searxng_alfred_core::transport::{FetchError, FetchOutcome, Fetcher};

#[allow(dead_code)]
pub const BACKEND: &str = "https://search.example";

#[allow(dead_code)]
pub fn test_config(cache_dir: &Path) -> Config {
    Config {
        backend_url: BACKEND.to_string(),
        cache_dir: cache_dir.to_path_buf(),
        ..Config::default()
    }
}

/// In-memory fetcher: prefix-routed text responses and a fixed favicon payload.
#[derive(Default)]
pub struct FakeFetcher {
    routes: Vec<(String, FetchOutcome)>,
    favicon: Option<Vec<u8>>,
    requests: RefCell<Vec<(String, Duration)>>,
    downloads: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, outcome: FetchOutcome) -> Self {
        self.routes.push((prefix.to_string(), outcome));
        self
    }

    pub fn search(self, body: &str) -> Self {
        self.route(&format!("{BACKEND}/search?"), FetchOutcome::ok(body))
    }

    pub fn suggestions(self, body: &str) -> Self {
        self.route(&format!("{BACKEND}/autocompleter?"), FetchOutcome::ok(body))
    }

    pub fn favicon(mut self, bytes: &[u8]) -> Self {
        self.favicon = Some(bytes.to_vec());
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn timeout_for(&self, prefix: &str) -> Option<Duration> {
        self.requests
            .borrow()
            .iter()
            .find(|(url, _)| url.starts_with(prefix))
            .map(|(_, timeout)| *timeout)
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn get_text(&self, url: &str, timeout: Duration) -> FetchOutcome {
        self.requests.borrow_mut().push((url.to_string(), timeout));
        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| FetchOutcome::failed(format!("no route for {url}")))
    }

    fn download(&self, url: &str, _timeout: Duration, dest: &Path) -> Result<u64, FetchError> {
        self.downloads.borrow_mut().push(url.to_string());
        match &self.favicon {
            Some(bytes) => {
                std::fs::write(dest, bytes)?;
                Ok(bytes.len() as u64)
            }
            None => Err(FetchError::Status(404)),
        }
    }
}
