//! HTTP capability consumed by the rule sets.
//!
//! Every call returns `Result<_, FetchError>` by value; a failed request is
//! data for the caller to turn into a finding, never a panic.

use crate::domain::constants::{default_user_agent, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Response headers keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_ascii_lowercase())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// True when the header exists with a non-empty value.
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Headers {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut h = Headers::default();
        for (k, v) in iter {
            h.insert(k, v);
        }
        h
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        let mut h = Headers::default();
        for (name, value) in map {
            h.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
        }
        h
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResponse {
    pub body: String,
    pub headers: Headers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub headers: Headers,
}

pub trait Fetcher {
    /// GET expecting 2xx and a JSON body, whatever the content-type says.
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
    /// GET expecting 2xx; the body is returned as text.
    fn fetch_text(&self, url: &str) -> Result<TextResponse, FetchError>;
    /// HEAD; any status that arrives counts as success.
    fn fetch_head(&self, url: &str) -> Result<HeadResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    fn get_ok(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().inspect_err(|e| {
            warn!(url, error = %e, "request failed");
        })?;
        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(resp)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.get_ok(url)?.text()?;
        serde_json::from_str(&body).map_err(|e| FetchError::Json(e.to_string()))
    }

    fn fetch_text(&self, url: &str) -> Result<TextResponse, FetchError> {
        let resp = self.get_ok(url)?;
        let headers = Headers::from(resp.headers());
        let body = resp.text()?;
        Ok(TextResponse { body, headers })
    }

    fn fetch_head(&self, url: &str) -> Result<HeadResponse, FetchError> {
        debug!(url, "HEAD");
        let resp = self.client.head(url).send().inspect_err(|e| {
            warn!(url, error = %e, "request failed");
        })?;
        Ok(HeadResponse {
            status: resp.status().as_u16(),
            headers: Headers::from(resp.headers()),
        })
    }
}
