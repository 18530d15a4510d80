use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use thiserror::Error;

const CLIENT_USER_AGENT: &str = concat!("searxng-alfred/", env!("CARGO_PKG_VERSION"));

/// Raw result of a text GET. Non-2xx responses still count as a success here;
/// the body decides how they are classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { status: u16, body: String },
    Failure(String),
}

impl FetchOutcome {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Success {
            status: 200,
            body: body.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failure(detail.into())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Single-attempt HTTP access used by every component; swapped for fakes in tests.
pub trait Fetcher {
    fn get_text(&self, url: &str, timeout: Duration) -> FetchOutcome;

    /// Streams a successful response body into `dest`, returning the byte count.
    fn download(&self, url: &str, timeout: Duration, dest: &Path) -> Result<u64, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str, timeout: Duration) -> FetchOutcome {
        log::debug!("GET {url} timeout={}ms", timeout.as_millis());
        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/json, */*;q=0.5")
            .timeout(timeout)
            .send()
        {
            Ok(response) => response,
            Err(error) => return FetchOutcome::Failure(error.to_string()),
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => FetchOutcome::Success { status, body },
            Err(error) => FetchOutcome::Failure(error.to_string()),
        }
    }

    fn download(&self, url: &str, timeout: Duration, dest: &Path) -> Result<u64, FetchError> {
        log::debug!("download {url} -> {}", dest.display());
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(timeout)
            .send()
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        std::fs::write(dest, &bytes)?;
        Ok(bytes.len() as u64)
    }
}
