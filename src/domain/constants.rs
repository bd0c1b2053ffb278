pub const DISCOVERY_SUFFIX: &str = "/.well-known/openid-configuration";
pub const APPLE_APP_SITE_ASSOCIATION_PATH: &str = "/.well-known/apple-app-site-association";
pub const ASSETLINKS_PATH: &str = "/.well-known/assetlinks.json";

pub const DEFAULT_TIMEOUT_SECS: f64 = 7.0;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// JWKS keys copied into the report metadata.
pub const JWKS_PREVIEW_KEYS: usize = 3;

/// Scope names (compared lowercase) that suggest over-broad grants.
pub const RISKY_SCOPES: [&str; 4] = ["admin", "root", "*", "all"];

/// Page markers that hint at a WebAuthn registration flow.
pub const WEBAUTHN_MARKERS: [&str; 2] = ["PublicKeyCredential", "navigator.credentials.create"];

pub fn default_user_agent() -> String {
    format!("oidc-lint/{}", env!("CARGO_PKG_VERSION"))
}
