//! Settings resolution: CLI flags over the optional TOML file over defaults.

use crate::cli::Cli;
use crate::domain::constants::{default_user_agent, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use crate::domain::models::ConfigFile;
use crate::services::fetch::HttpConfig;
use crate::services::scan::ScanOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub http: HttpConfig,
    pub scan: ScanOptions,
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/oidc-lint/config.toml"))
}

/// An explicit path must exist; the default location is optional.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(ConfigFile::default()),
        },
    };
    debug!(path = %path.display(), "loading config");
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

pub fn resolve(cli: &Cli, file: &ConfigFile) -> Result<Settings, ConfigError> {
    let timeout = cli
        .timeout
        .or(file.http.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout <= 0.0 {
        return Err(ConfigError::InvalidTimeout(timeout));
    }
    let timeout =
        Duration::try_from_secs_f64(timeout).map_err(|_| ConfigError::InvalidTimeout(timeout))?;

    Ok(Settings {
        http: HttpConfig {
            timeout,
            user_agent: file
                .http
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
            max_redirects: file.http.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
        },
        scan: ScanOptions {
            passkey: !cli.no_passkey && file.scan.passkey.unwrap_or(true),
        },
    })
}
