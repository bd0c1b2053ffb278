use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MED")]
    Med,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "INFO")]
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Med => "MED",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every rule outcome the scanner can report.
///
/// The id string is part of the report contract; never rename one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    MissingIssuer,
    MissingAuthorizationEndpoint,
    MissingTokenEndpoint,
    MissingJwksUri,
    HttpsIssuer,
    HttpsAuthorizationEndpoint,
    HttpsTokenEndpoint,
    HttpsJwksUri,
    HttpsUserinfoEndpoint,
    CrossOriginAuthorizationEndpoint,
    CrossOriginTokenEndpoint,
    CrossOriginJwksUri,
    PkceS256Missing,
    PkcePlainPresent,
    CodeFlowMissing,
    ImplicitEnabled,
    HmacOnlyIdToken,
    UserinfoMissing,
    IntrospectionMissing,
    RevocationMissing,
    ScopeCreep,
    AuthEndpointHeadFail,
    CspMissing,
    XfoMissing,
    PasskeyFetchFail,
    PasskeyNotReady,
    PasskeyHintsPresent,
    DiscoveryUnreachable,
    JwksUnreachable,
    JwksMissing,
}

impl FindingKind {
    pub fn id(self) -> &'static str {
        match self {
            FindingKind::MissingIssuer => "MISSING_ISSUER",
            FindingKind::MissingAuthorizationEndpoint => "MISSING_AUTHORIZATION_ENDPOINT",
            FindingKind::MissingTokenEndpoint => "MISSING_TOKEN_ENDPOINT",
            FindingKind::MissingJwksUri => "MISSING_JWKS_URI",
            FindingKind::HttpsIssuer => "HTTPS_ISSUER",
            FindingKind::HttpsAuthorizationEndpoint => "HTTPS_AUTHORIZATION_ENDPOINT",
            FindingKind::HttpsTokenEndpoint => "HTTPS_TOKEN_ENDPOINT",
            FindingKind::HttpsJwksUri => "HTTPS_JWKS_URI",
            FindingKind::HttpsUserinfoEndpoint => "HTTPS_USERINFO_ENDPOINT",
            FindingKind::CrossOriginAuthorizationEndpoint => "CROSS_ORIGIN_AUTHORIZATION_ENDPOINT",
            FindingKind::CrossOriginTokenEndpoint => "CROSS_ORIGIN_TOKEN_ENDPOINT",
            FindingKind::CrossOriginJwksUri => "CROSS_ORIGIN_JWKS_URI",
            FindingKind::PkceS256Missing => "PKCE_S256_MISSING",
            FindingKind::PkcePlainPresent => "PKCE_PLAIN_PRESENT",
            FindingKind::CodeFlowMissing => "CODE_FLOW_MISSING",
            FindingKind::ImplicitEnabled => "IMPLICIT_ENABLED",
            FindingKind::HmacOnlyIdToken => "HMAC_ONLY_IDTOKEN",
            FindingKind::UserinfoMissing => "USERINFO_MISSING",
            FindingKind::IntrospectionMissing => "INTROSPECTION_MISSING",
            FindingKind::RevocationMissing => "REVOCATION_MISSING",
            FindingKind::ScopeCreep => "SCOPE_CREEP",
            FindingKind::AuthEndpointHeadFail => "AUTH_ENDPOINT_HEAD_FAIL",
            FindingKind::CspMissing => "CSP_MISSING",
            FindingKind::XfoMissing => "XFO_MISSING",
            FindingKind::PasskeyFetchFail => "PASSKEY_FETCH_FAIL",
            FindingKind::PasskeyNotReady => "PASSKEY_NOT_READY",
            FindingKind::PasskeyHintsPresent => "PASSKEY_HINTS_PRESENT",
            FindingKind::DiscoveryUnreachable => "DISCOVERY_UNREACHABLE",
            FindingKind::JwksUnreachable => "JWKS_UNREACHABLE",
            FindingKind::JwksMissing => "JWKS_MISSING",
        }
    }

    pub fn severity(self) -> Severity {
        use FindingKind::*;
        match self {
            MissingIssuer | MissingAuthorizationEndpoint | MissingTokenEndpoint
            | MissingJwksUri | HttpsIssuer | HttpsAuthorizationEndpoint | HttpsTokenEndpoint
            | HttpsJwksUri | HttpsUserinfoEndpoint | PkceS256Missing | CodeFlowMissing
            | HmacOnlyIdToken | DiscoveryUnreachable | JwksUnreachable | JwksMissing => {
                Severity::High
            }
            CrossOriginAuthorizationEndpoint | CrossOriginTokenEndpoint | CrossOriginJwksUri
            | PkcePlainPresent | ImplicitEnabled | ScopeCreep => Severity::Med,
            UserinfoMissing | IntrospectionMissing | RevocationMissing | AuthEndpointHeadFail
            | CspMissing | XfoMissing | PasskeyFetchFail => Severity::Low,
            PasskeyNotReady | PasskeyHintsPresent => Severity::Info,
        }
    }

    /// Fixed message; detailed findings append `": <detail>"`.
    pub fn summary(self) -> &'static str {
        match self {
            FindingKind::MissingIssuer => "issuer is missing in discovery",
            FindingKind::MissingAuthorizationEndpoint => {
                "authorization_endpoint is missing in discovery"
            }
            FindingKind::MissingTokenEndpoint => "token_endpoint is missing in discovery",
            FindingKind::MissingJwksUri => "jwks_uri is missing in discovery",
            FindingKind::HttpsIssuer => "issuer should be https",
            FindingKind::HttpsAuthorizationEndpoint => "authorization_endpoint should be https",
            FindingKind::HttpsTokenEndpoint => "token_endpoint should be https",
            FindingKind::HttpsJwksUri => "jwks_uri should be https",
            FindingKind::HttpsUserinfoEndpoint => "userinfo_endpoint should be https",
            FindingKind::CrossOriginAuthorizationEndpoint => {
                "authorization_endpoint is hosted on different host"
            }
            FindingKind::CrossOriginTokenEndpoint => "token_endpoint is hosted on different host",
            FindingKind::CrossOriginJwksUri => "jwks_uri is hosted on different host",
            FindingKind::PkceS256Missing => "PKCE S256 not advertised",
            FindingKind::PkcePlainPresent => "PKCE 'plain' allowed; discourage",
            FindingKind::CodeFlowMissing => "Authorization Code flow not advertised",
            FindingKind::ImplicitEnabled => {
                "Implicit/hybrid response types enabled (token/id_token)"
            }
            FindingKind::HmacOnlyIdToken => "Only HS* id_token algs; prefer RS*/ES*/EdDSA",
            FindingKind::UserinfoMissing => "userinfo endpoint missing",
            FindingKind::IntrospectionMissing => "introspection endpoint not advertised",
            FindingKind::RevocationMissing => "revocation endpoint not advertised",
            FindingKind::ScopeCreep => "unusual scopes present",
            FindingKind::AuthEndpointHeadFail => "head failed",
            FindingKind::CspMissing => "CSP header missing on auth endpoint",
            FindingKind::XfoMissing => "X-Frame-Options missing on auth endpoint",
            FindingKind::PasskeyFetchFail => "landing fetch failed",
            FindingKind::PasskeyNotReady => "No obvious WebAuthn/passkey hints found",
            FindingKind::PasskeyHintsPresent => "Passkey/WebAuthn hints",
            FindingKind::DiscoveryUnreachable => "Cannot fetch discovery",
            FindingKind::JwksUnreachable => "JWKS not reachable",
            FindingKind::JwksMissing => "jwks_uri missing in discovery",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    pub fn new(kind: FindingKind) -> Self {
        Self {
            kind,
            message: kind.summary().to_string(),
        }
    }

    pub fn with_detail(kind: FindingKind, detail: impl fmt::Display) -> Self {
        Self {
            kind,
            message: format!("{}: {}", kind.summary(), detail),
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

#[derive(Serialize)]
struct FindingRecord<'a> {
    id: &'a str,
    sev: Severity,
    msg: &'a str,
}

impl Serialize for Finding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FindingRecord {
            id: self.id(),
            sev: self.severity(),
            msg: &self.message,
        }
        .serialize(serializer)
    }
}

/// Discovery fields echoed into the report once the document was fetched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscoverySnapshot {
    pub discovery_url: String,
    pub issuer: Option<String>,
    pub authorization_endpoint: Option<String>,
    pub token_endpoint: Option<String>,
    pub jwks_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReportMeta {
    #[serde(flatten)]
    pub discovery: Option<DiscoverySnapshot>,
    /// Leading JWKS entries, surfaced verbatim and never validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks_keys: Option<Vec<serde_json::Value>>,
}

impl ReportMeta {
    pub fn is_empty(&self) -> bool {
        self.discovery.is_none() && self.jwks_keys.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub target: String,
    pub issues: Vec<Finding>,
    pub meta: ReportMeta,
    /// Wall-clock seconds spent scanning, rounded to milliseconds.
    pub time: f64,
}

impl Report {
    pub fn count_at(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|f| f.severity() == severity)
            .count()
    }
}

/// On-disk configuration (`config.toml`). Every key is optional.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub scan: ScanSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct HttpSection {
    pub timeout_secs: Option<f64>,
    pub user_agent: Option<String>,
    pub max_redirects: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScanSection {
    pub passkey: Option<bool>,
}
