//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `oidc_rules.rs` — discovery-metadata rules + authorization endpoint header probe.
//! - `passkey.rs` — passkey/WebAuthn readiness heuristics.
//! - `scan.rs` — target parsing, discovery/JWKS fetch, report assembly.
//! - `fetch.rs` — `Fetcher` trait and the blocking HTTP implementation.
//! - `config.rs` — config file loading and flag/file/default resolution.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Network access goes through `Fetcher` only.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod fetch;
pub mod oidc_rules;
pub mod output;
pub mod passkey;
pub mod scan;
