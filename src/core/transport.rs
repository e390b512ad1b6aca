use crate::models::error::SError;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Source of remote bytes: mod archives and catalog documents.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>, SError>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// `timeout` bounds a whole transfer; `None` lets large downloads run as long as they need.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::blocking::Client {
        &self.client
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>, SError> {
        debug!("GET {}", redact(url));
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SError::Transport {
                url: redact(url),
                reason: e.without_url().to_string(),
            })?;
        Ok(Box::new(response))
    }
}

/// Strips the query string, which may carry catalog credentials.
pub fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?…"),
        None => url.to_string(),
    }
}
