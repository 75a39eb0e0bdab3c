//! Value objects owned by an item.
//!
//! These own all of their data, so `Clone` is a deep copy: a cloned value
//! shares nothing with its source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key/value pair used for headers, query strings, form data and chaining rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

/// Request target: base address plus ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Url {
    pub base: String,
    pub queries: Vec<Parameter>,
}

impl Url {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            queries: Vec::new(),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        let mut enabled = self.queries.iter().filter(|q| q.enabled);
        if let Some(first) = enabled.next() {
            write!(f, "?{}={}", first.key, first.value)?;
            for q in enabled {
                write!(f, "&{}={}", q.key, q.value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthKind {
    #[default]
    None,
    Basic,
    Bearer,
    Digest,
    OAuth2,
}

/// Authentication settings; `values` holds the scheme-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authentication {
    pub kind: AuthKind,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    #[default]
    None,
    Json,
    Xml,
    Text,
    FormEncoded,
    FormData,
    Binary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub kind: BodyKind,
    pub text: String,
    pub form_data: Vec<Parameter>,
}

/// Last response received for a request item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceResponse {
    pub status_code: u16,
    pub status_text: String,
    pub headers: Vec<Parameter>,
    pub body: String,
    pub elapsed_ms: u64,
}
