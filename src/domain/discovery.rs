//! Typed view over an OpenID Connect discovery document.
//!
//! Providers publish all sorts of shapes here, so every recognized field is
//! optional and decoding never fails on a field's type. Scalar fields keep
//! three states (see [`FieldValue`]); a truthy value of the wrong JSON type is
//! present, just not usable as a URL. Unrecognized keys are kept in
//! [`DiscoveryDocument::extra`].

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A recognized scalar field as the provider published it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Missing, `null`, or falsy: `""`, `false`, `0`, `[]`, `{}`.
    #[default]
    Absent,
    Text(String),
    /// Truthy but not a string.
    Other(Value),
}

impl FieldValue {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => FieldValue::Absent,
            Value::String(s) if s.is_empty() => FieldValue::Absent,
            Value::String(s) => FieldValue::Text(s),
            Value::Number(ref n) if n.as_f64() == Some(0.0) => FieldValue::Absent,
            Value::Array(ref items) if items.is_empty() => FieldValue::Absent,
            Value::Object(ref map) if map.is_empty() => FieldValue::Absent,
            other => FieldValue::Other(other),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// The value when it is a non-empty string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DiscoveryDocument {
    #[serde(default, deserialize_with = "field_value")]
    pub issuer: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub authorization_endpoint: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub token_endpoint: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub jwks_uri: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub userinfo_endpoint: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub introspection_endpoint: FieldValue,
    #[serde(default, deserialize_with = "field_value")]
    pub revocation_endpoint: FieldValue,
    #[serde(default, deserialize_with = "string_list")]
    pub code_challenge_methods_supported: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub response_types_supported: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub id_token_signing_alg_values_supported: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub scopes_supported: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiscoveryDocument {
    /// Decodes a fetched JSON body. Only a non-object top level is an error.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

fn field_value<'de, D>(deserializer: D) -> Result<FieldValue, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(FieldValue::from_json)
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
