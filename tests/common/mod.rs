#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Nothing listens here, so every request is refused straight away.
pub const DEAD_TARGET: &str = "http://127.0.0.1:1";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub out_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let out_dir = tmp.path().join("out");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&out_dir).expect("create out dir");
        Self {
            _tmp: tmp,
            home,
            out_dir,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("oidc-lint");
        cmd.env("HOME", &self.home)
            .env_remove("OIDC_LINT_TIMEOUT")
            .env_remove("OIDC_LINT_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write_config(&self, body: &str) -> PathBuf {
        let dir = self.home.join(".config/oidc-lint");
        fs::create_dir_all(&dir).expect("create config dir");
        let path = dir.join("config.toml");
        fs::write(&path, body).expect("write config");
        path
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn issue_ids(report: &Value) -> Vec<String> {
    report["issues"]
        .as_array()
        .expect("issues array")
        .iter()
        .map(|i| i["id"].as_str().expect("issue id").to_string())
        .collect()
}

/// Discovery document whose endpoints all live under `base`.
pub fn discovery_for(base: &str) -> Value {
    json!({
        "issuer": base,
        "authorization_endpoint": format!("{base}/auth"),
        "token_endpoint": format!("{base}/token"),
        "jwks_uri": format!("{base}/jwks"),
        "userinfo_endpoint": format!("{base}/userinfo"),
        "introspection_endpoint": format!("{base}/introspect"),
        "revocation_endpoint": format!("{base}/revoke"),
        "code_challenge_methods_supported": ["S256"],
        "response_types_supported": ["code"],
        "id_token_signing_alg_values_supported": ["RS256"],
        "scopes_supported": ["openid", "email"]
    })
}
