//! Discovery-metadata rules.
//!
//! [`evaluate_document`] holds every rule that only looks at the fetched
//! document. [`probe_authorization_endpoint`] is the one rule that goes back
//! to the network. [`evaluate`] runs both in report order.

use crate::domain::constants::RISKY_SCOPES;
use crate::domain::discovery::DiscoveryDocument;
use crate::domain::models::{Finding, FindingKind};
use crate::services::fetch::Fetcher;
use tracing::debug;

pub fn evaluate(
    fetcher: &dyn Fetcher,
    doc: &DiscoveryDocument,
    issuer_host: &str,
) -> Vec<Finding> {
    let mut issues = evaluate_document(doc, issuer_host);
    issues.extend(probe_authorization_endpoint(fetcher, doc));
    debug!(count = issues.len(), "discovery rules evaluated");
    issues
}

pub fn evaluate_document(doc: &DiscoveryDocument, issuer_host: &str) -> Vec<Finding> {
    let mut issues = Vec::new();
    check_required(doc, &mut issues);
    check_https(doc, &mut issues);
    check_cross_origin(doc, issuer_host, &mut issues);
    check_pkce(doc, &mut issues);
    check_response_types(doc, &mut issues);
    check_id_token_algs(doc, &mut issues);
    check_optional_endpoints(doc, &mut issues);
    check_scopes(doc, &mut issues);
    issues
}

fn check_required(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let required = [
        (&doc.issuer, FindingKind::MissingIssuer),
        (&doc.authorization_endpoint, FindingKind::MissingAuthorizationEndpoint),
        (&doc.token_endpoint, FindingKind::MissingTokenEndpoint),
        (&doc.jwks_uri, FindingKind::MissingJwksUri),
    ];
    for (value, kind) in required {
        if value.is_absent() {
            issues.push(Finding::new(kind));
        }
    }
}

fn is_https(url: &str) -> bool {
    url.get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

fn check_https(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let endpoints = [
        (&doc.issuer, FindingKind::HttpsIssuer),
        (&doc.authorization_endpoint, FindingKind::HttpsAuthorizationEndpoint),
        (&doc.token_endpoint, FindingKind::HttpsTokenEndpoint),
        (&doc.jwks_uri, FindingKind::HttpsJwksUri),
        (&doc.userinfo_endpoint, FindingKind::HttpsUserinfoEndpoint),
    ];
    for (value, kind) in endpoints {
        if value.as_str().is_some_and(|v| !is_https(v)) {
            issues.push(Finding::new(kind));
        }
    }
}

// Substring containment, not hostname comparison: a host that shows up in a
// path passes, and `notidp.example` passes for `idp.example`.
fn check_cross_origin(doc: &DiscoveryDocument, issuer_host: &str, issues: &mut Vec<Finding>) {
    let endpoints = [
        (&doc.authorization_endpoint, FindingKind::CrossOriginAuthorizationEndpoint),
        (&doc.token_endpoint, FindingKind::CrossOriginTokenEndpoint),
        (&doc.jwks_uri, FindingKind::CrossOriginJwksUri),
    ];
    for (value, kind) in endpoints {
        if let Some(v) = value.as_str() {
            if !v.contains(issuer_host) {
                issues.push(Finding::with_detail(kind, v));
            }
        }
    }
}

fn check_pkce(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let methods = &doc.code_challenge_methods_supported;
    if !methods.iter().any(|m| m == "S256") {
        issues.push(Finding::new(FindingKind::PkceS256Missing));
    }
    if methods.iter().any(|m| m == "plain") {
        issues.push(Finding::new(FindingKind::PkcePlainPresent));
    }
}

fn check_response_types(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let types = &doc.response_types_supported;
    if !types.iter().any(|t| t.contains("code")) {
        issues.push(Finding::new(FindingKind::CodeFlowMissing));
    }
    if types.iter().any(|t| t.contains("token")) {
        issues.push(Finding::new(FindingKind::ImplicitEnabled));
    }
}

fn check_id_token_algs(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let algs = &doc.id_token_signing_alg_values_supported;
    if !algs.is_empty() && algs.iter().all(|a| a.starts_with("HS")) {
        issues.push(Finding::new(FindingKind::HmacOnlyIdToken));
    }
}

fn check_optional_endpoints(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let optional = [
        (&doc.userinfo_endpoint, FindingKind::UserinfoMissing),
        (&doc.introspection_endpoint, FindingKind::IntrospectionMissing),
        (&doc.revocation_endpoint, FindingKind::RevocationMissing),
    ];
    for (value, kind) in optional {
        if value.is_absent() {
            issues.push(Finding::new(kind));
        }
    }
}

fn check_scopes(doc: &DiscoveryDocument, issues: &mut Vec<Finding>) {
    let unusual: Vec<&str> = doc
        .scopes_supported
        .iter()
        .filter(|s| RISKY_SCOPES.contains(&s.to_lowercase().as_str()))
        .map(String::as_str)
        .collect();
    if !unusual.is_empty() {
        issues.push(Finding::with_detail(
            FindingKind::ScopeCreep,
            unusual.join(", "),
        ));
    }
}

/// HEADs the authorization endpoint and checks its framing/CSP headers.
pub fn probe_authorization_endpoint(
    fetcher: &dyn Fetcher,
    doc: &DiscoveryDocument,
) -> Vec<Finding> {
    let Some(auth) = doc.authorization_endpoint.as_str() else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    match fetcher.fetch_head(auth) {
        Err(e) => issues.push(Finding::with_detail(FindingKind::AuthEndpointHeadFail, e)),
        Ok(resp) => {
            debug!(url = auth, status = resp.status, "authorization endpoint probed");
            if !resp.headers.has_value("content-security-policy") {
                issues.push(Finding::new(FindingKind::CspMissing));
            }
            if !resp.headers.has_value("x-frame-options") {
                issues.push(Finding::new(FindingKind::XfoMissing));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::{evaluate, evaluate_document, probe_authorization_endpoint};
    use crate::domain::discovery::DiscoveryDocument;
    use crate::domain::models::{Finding, Severity};
    use crate::services::fetch::testing::StubFetcher;
    use serde_json::{json, Value};

    fn doc(v: Value) -> DiscoveryDocument {
        DiscoveryDocument::from_json(v).unwrap()
    }

    fn ids(issues: &[Finding]) -> Vec<&'static str> {
        issues.iter().map(|f| f.id()).collect()
    }

    fn healthy() -> Value {
        json!({
            "issuer": "https://idp.example",
            "authorization_endpoint": "https://idp.example/auth",
            "token_endpoint": "https://idp.example/token",
            "jwks_uri": "https://idp.example/jwks",
            "userinfo_endpoint": "https://idp.example/userinfo",
            "introspection_endpoint": "https://idp.example/introspect",
            "revocation_endpoint": "https://idp.example/revoke",
            "code_challenge_methods_supported": ["S256"],
            "response_types_supported": ["code"],
            "id_token_signing_alg_values_supported": ["RS256"],
            "scopes_supported": ["openid", "profile"]
        })
    }

    fn healthy_with(key: &str, value: Value) -> DiscoveryDocument {
        let mut v = healthy();
        v[key] = value;
        doc(v)
    }

    fn healthy_without(key: &str) -> DiscoveryDocument {
        let mut v = healthy();
        v.as_object_mut().unwrap().remove(key);
        doc(v)
    }

    #[test]
    fn healthy_document_has_no_findings() {
        assert!(evaluate_document(&doc(healthy()), "idp.example").is_empty());
    }

    #[test]
    fn missing_required_field_is_not_also_flagged_as_http() {
        for field in ["issuer", "authorization_endpoint", "token_endpoint", "jwks_uri"] {
            let issues = evaluate_document(&healthy_without(field), "idp.example");
            let found = ids(&issues);
            let missing = format!("MISSING_{}", field.to_ascii_uppercase());
            let https = format!("HTTPS_{}", field.to_ascii_uppercase());
            assert!(found.contains(&missing.as_str()), "{field}: {found:?}");
            assert!(!found.contains(&https.as_str()), "{field}: {found:?}");
        }
    }

    #[test]
    fn empty_required_field_counts_as_missing() {
        let issues = evaluate_document(&healthy_with("token_endpoint", json!("")), "idp.example");
        assert_eq!(ids(&issues), vec!["MISSING_TOKEN_ENDPOINT"]);
    }

    #[test]
    fn truthy_non_string_fields_are_not_missing() {
        let mut v = healthy();
        v["issuer"] = json!(42);
        v["userinfo_endpoint"] = json!({"url": "https://idp.example/userinfo"});
        let issues = evaluate_document(&doc(v), "idp.example");
        assert!(issues.is_empty(), "{:?}", ids(&issues));
    }

    #[test]
    fn non_string_auth_endpoint_is_neither_checked_nor_probed() {
        let d = healthy_with("authorization_endpoint", json!(["http://other.example/auth"]));
        let fetcher = StubFetcher::new();
        let issues = evaluate(&fetcher, &d, "idp.example");
        assert!(issues.is_empty(), "{:?}", ids(&issues));
        assert!(fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn plain_http_fields_are_flagged() {
        let issues = evaluate_document(
            &healthy_with("userinfo_endpoint", json!("http://idp.example/userinfo")),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["HTTPS_USERINFO_ENDPOINT"]);
        assert_eq!(issues[0].severity(), Severity::High);
    }

    #[test]
    fn https_scheme_match_ignores_case() {
        let issues = evaluate_document(
            &healthy_with("token_endpoint", json!("HTTPS://idp.example/token")),
            "idp.example",
        );
        assert!(issues.is_empty(), "{:?}", ids(&issues));
    }

    #[test]
    fn short_values_are_not_https() {
        let issues = evaluate_document(&healthy_with("issuer", json!("h")), "h");
        assert_eq!(ids(&issues), vec!["HTTPS_ISSUER"]);
    }

    #[test]
    fn foreign_host_is_cross_origin() {
        let issues = evaluate_document(
            &healthy_with("jwks_uri", json!("https://keys.other.example/jwks")),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["CROSS_ORIGIN_JWKS_URI"]);
        assert_eq!(
            issues[0].message,
            "jwks_uri is hosted on different host: https://keys.other.example/jwks"
        );
        assert_eq!(issues[0].severity(), Severity::Med);
    }

    #[test]
    fn cross_origin_is_substring_containment() {
        let issues = evaluate_document(
            &healthy_with("token_endpoint", json!("https://notidp.example/token")),
            "idp.example",
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn pkce_rules() {
        let issues = evaluate_document(
            &healthy_with("code_challenge_methods_supported", json!(["S256", "plain"])),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["PKCE_PLAIN_PRESENT"]);

        let issues = evaluate_document(
            &healthy_with("code_challenge_methods_supported", json!(["plain"])),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["PKCE_S256_MISSING", "PKCE_PLAIN_PRESENT"]);

        let issues = evaluate_document(
            &healthy_without("code_challenge_methods_supported"),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["PKCE_S256_MISSING"]);
    }

    #[test]
    fn hybrid_response_types_enable_implicit() {
        let issues = evaluate_document(
            &healthy_with("response_types_supported", json!(["code", "token id_token"])),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["IMPLICIT_ENABLED"]);
    }

    #[test]
    fn no_code_response_type_means_no_code_flow() {
        let issues = evaluate_document(&healthy_without("response_types_supported"), "idp.example");
        assert_eq!(ids(&issues), vec!["CODE_FLOW_MISSING"]);
    }

    #[test]
    fn hmac_only_id_token_algs() {
        let only_hs = evaluate_document(
            &healthy_with("id_token_signing_alg_values_supported", json!(["HS256"])),
            "idp.example",
        );
        assert_eq!(ids(&only_hs), vec!["HMAC_ONLY_IDTOKEN"]);

        let mixed = evaluate_document(
            &healthy_with(
                "id_token_signing_alg_values_supported",
                json!(["RS256", "HS256"]),
            ),
            "idp.example",
        );
        assert!(mixed.is_empty());

        let empty = evaluate_document(
            &healthy_with("id_token_signing_alg_values_supported", json!([])),
            "idp.example",
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn optional_endpoints_are_low() {
        let mut v = healthy();
        let obj = v.as_object_mut().unwrap();
        obj.remove("userinfo_endpoint");
        obj.remove("introspection_endpoint");
        obj.remove("revocation_endpoint");
        let issues = evaluate_document(&doc(v), "idp.example");
        assert_eq!(
            ids(&issues),
            vec!["USERINFO_MISSING", "INTROSPECTION_MISSING", "REVOCATION_MISSING"]
        );
        assert!(issues.iter().all(|f| f.severity() == Severity::Low));
    }

    #[test]
    fn scope_creep_keeps_casing_and_order() {
        let issues = evaluate_document(
            &healthy_with(
                "scopes_supported",
                json!(["openid", "Admin", "email", "*", "ALL", "rooted"]),
            ),
            "idp.example",
        );
        assert_eq!(ids(&issues), vec!["SCOPE_CREEP"]);
        assert_eq!(issues[0].message, "unusual scopes present: Admin, *, ALL");
    }

    #[test]
    fn insecure_auth_endpoint_yields_single_high_or_med_finding() {
        let d = doc(json!({
            "issuer": "https://idp.example",
            "authorization_endpoint": "http://idp.example/auth",
            "token_endpoint": "https://idp.example/token",
            "jwks_uri": "https://idp.example/jwks",
            "code_challenge_methods_supported": ["S256"],
            "response_types_supported": ["code"]
        }));
        let issues = evaluate_document(&d, "idp.example");
        let serious: Vec<&Finding> = issues
            .iter()
            .filter(|f| matches!(f.severity(), Severity::High | Severity::Med))
            .collect();
        assert_eq!(serious.len(), 1);
        assert_eq!(serious[0].id(), "HTTPS_AUTHORIZATION_ENDPOINT");
    }

    #[test]
    fn rule_order_is_fixed() {
        let issues = evaluate_document(&doc(json!({})), "idp.example");
        assert_eq!(
            ids(&issues),
            vec![
                "MISSING_ISSUER",
                "MISSING_AUTHORIZATION_ENDPOINT",
                "MISSING_TOKEN_ENDPOINT",
                "MISSING_JWKS_URI",
                "PKCE_S256_MISSING",
                "CODE_FLOW_MISSING",
                "USERINFO_MISSING",
                "INTROSPECTION_MISSING",
                "REVOCATION_MISSING",
            ]
        );
    }

    #[test]
    fn head_probe_reports_missing_security_headers() {
        let d = doc(healthy());
        let fetcher = StubFetcher::new().head("https://idp.example/auth", &[("Server", "x")]);
        let issues = probe_authorization_endpoint(&fetcher, &d);
        assert_eq!(ids(&issues), vec!["CSP_MISSING", "XFO_MISSING"]);
    }

    #[test]
    fn head_probe_accepts_headers_in_any_case() {
        let d = doc(healthy());
        let fetcher = StubFetcher::new().head(
            "https://idp.example/auth",
            &[
                ("Content-Security-Policy", "frame-ancestors 'none'"),
                ("X-FRAME-OPTIONS", "DENY"),
            ],
        );
        assert!(probe_authorization_endpoint(&fetcher, &d).is_empty());
    }

    #[test]
    fn head_probe_failure_is_low() {
        let d = doc(healthy());
        let fetcher = StubFetcher::new();
        let issues = probe_authorization_endpoint(&fetcher, &d);
        assert_eq!(ids(&issues), vec!["AUTH_ENDPOINT_HEAD_FAIL"]);
        assert_eq!(issues[0].severity(), Severity::Low);
        assert!(issues[0]
            .message
            .starts_with("head failed: connection refused"));
    }

    #[test]
    fn head_probe_skipped_without_auth_endpoint() {
        let d = healthy_without("authorization_endpoint");
        let fetcher = StubFetcher::new();
        assert!(probe_authorization_endpoint(&fetcher, &d).is_empty());
        assert!(fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn evaluate_appends_probe_after_document_rules() {
        let d = healthy_with("response_types_supported", json!(["code", "token"]));
        let fetcher = StubFetcher::new().head("https://idp.example/auth", &[]);
        let issues = evaluate(&fetcher, &d, "idp.example");
        assert_eq!(
            ids(&issues),
            vec!["IMPLICIT_ENABLED", "CSP_MISSING", "XFO_MISSING"]
        );
    }
}
