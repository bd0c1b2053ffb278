//! Passkey readiness heuristics.
//!
//! No WebAuthn ceremony is attempted. The landing page and the two mobile
//! app-association files are fetched and counted as hints, so the outcome is
//! always INFO unless the landing page itself cannot be fetched.

use crate::domain::constants::{
    APPLE_APP_SITE_ASSOCIATION_PATH, ASSETLINKS_PATH, WEBAUTHN_MARKERS,
};
use crate::domain::models::{Finding, FindingKind};
use crate::services::fetch::Fetcher;
use tracing::debug;
use url::Url;

pub fn evaluate(fetcher: &dyn Fetcher, target: &Url) -> Vec<Finding> {
    let base = target.origin().ascii_serialization();
    let landing = match fetcher.fetch_text(&base) {
        Ok(resp) => resp.body,
        Err(e) => return vec![Finding::with_detail(FindingKind::PasskeyFetchFail, e)],
    };

    let mut hints = 0usize;
    if WEBAUTHN_MARKERS.iter().any(|m| landing.contains(m)) {
        hints += 1;
    }
    for path in [APPLE_APP_SITE_ASSOCIATION_PATH, ASSETLINKS_PATH] {
        if has_content(fetcher, &format!("{base}{path}")) {
            hints += 1;
        }
    }
    debug!(origin = %base, hints, "passkey heuristics evaluated");

    if hints == 0 {
        vec![Finding::new(FindingKind::PasskeyNotReady)]
    } else {
        vec![Finding::with_detail(FindingKind::PasskeyHintsPresent, hints)]
    }
}

fn has_content(fetcher: &dyn Fetcher, url: &str) -> bool {
    fetcher
        .fetch_text(url)
        .is_ok_and(|resp| !resp.body.trim().is_empty())
}
