//! Scan orchestration: discovery fetch, rule sets, JWKS peek, report envelope.

use crate::domain::constants::{DISCOVERY_SUFFIX, JWKS_PREVIEW_KEYS};
use crate::domain::discovery::DiscoveryDocument;
use crate::domain::models::{DiscoverySnapshot, Finding, FindingKind, Report, ReportMeta};
use crate::services::fetch::{FetchError, Fetcher};
use crate::services::{oidc_rules, passkey};
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("URL must start with http/https")]
    UnsupportedScheme,
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
}

/// A validated scan target.
#[derive(Debug, Clone)]
pub struct Target {
    raw: String,
    url: Url,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let raw = raw.trim();
        let url = Url::parse(raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TargetError::UnsupportedScheme);
        }
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host plus explicit port, matched against endpoint URLs.
    pub fn authority(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// The issuer is the URL minus the discovery suffix, or else its origin.
    pub fn discovery_url(&self) -> String {
        let issuer = match self.raw.strip_suffix(DISCOVERY_SUFFIX) {
            Some(prefix) => prefix.to_string(),
            None => self.url.origin().ascii_serialization(),
        };
        format!("{}{}", issuer.trim_end_matches('/'), DISCOVERY_SUFFIX)
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub passkey: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { passkey: true }
    }
}

pub fn run_scan(fetcher: &dyn Fetcher, target: &Target, opts: &ScanOptions) -> Report {
    let started = Instant::now();
    info!(url = target.as_str(), "scan started");

    let mut issues = Vec::new();
    let mut meta = ReportMeta::default();

    let discovery_url = target.discovery_url();
    match fetch_discovery(fetcher, &discovery_url) {
        Err(e) => {
            warn!(url = %discovery_url, error = %e, "discovery unavailable");
            issues.push(Finding::with_detail(FindingKind::DiscoveryUnreachable, e));
        }
        Ok(doc) => {
            meta.discovery = Some(DiscoverySnapshot {
                discovery_url,
                issuer: doc.issuer.as_str().map(str::to_string),
                authorization_endpoint: doc.authorization_endpoint.as_str().map(str::to_string),
                token_endpoint: doc.token_endpoint.as_str().map(str::to_string),
                jwks_uri: doc.jwks_uri.as_str().map(str::to_string),
            });
            issues.extend(oidc_rules::evaluate(fetcher, &doc, &target.authority()));
            peek_jwks(fetcher, &doc, &mut issues, &mut meta);
        }
    }

    if opts.passkey {
        issues.extend(passkey::evaluate(fetcher, target.url()));
    }

    let time = (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;
    info!(issues = issues.len(), time, "scan finished");
    Report {
        target: target.as_str().to_string(),
        issues,
        meta,
        time,
    }
}

fn fetch_discovery(fetcher: &dyn Fetcher, url: &str) -> Result<DiscoveryDocument, FetchError> {
    let body = fetcher.fetch_json(url)?;
    DiscoveryDocument::from_json(body).map_err(|e| FetchError::Json(e.to_string()))
}

fn peek_jwks(
    fetcher: &dyn Fetcher,
    doc: &DiscoveryDocument,
    issues: &mut Vec<Finding>,
    meta: &mut ReportMeta,
) {
    let Some(jwks_uri) = doc.jwks_uri.as_str() else {
        issues.push(Finding::new(FindingKind::JwksMissing));
        return;
    };
    match fetcher.fetch_json(jwks_uri) {
        Ok(jwks) => {
            let keys: Vec<Value> = jwks
                .get("keys")
                .and_then(Value::as_array)
                .map(|keys| keys.iter().take(JWKS_PREVIEW_KEYS).cloned().collect())
                .unwrap_or_default();
            meta.jwks_keys = Some(keys);
        }
        Err(e) => {
            warn!(url = jwks_uri, error = %e, "jwks unavailable");
            issues.push(Finding::with_detail(FindingKind::JwksUnreachable, e));
        }
    }
}
