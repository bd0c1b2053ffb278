//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep finding/report/document types in one place.
//! - Avoid cyclic imports between the rule sets and the scan orchestrator.
//! - Make JSON report schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — severities, finding kinds, findings, report envelope.
//! - `discovery.rs` — typed OpenID Connect discovery document.
//! - `constants.rs` — well-known paths, rule inputs, defaults.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs affect the JSON report.
//! Keep schema-impacting changes synchronized with `docs/contracts/report.schema.json`.

pub mod constants;
pub mod discovery;
pub mod models;
