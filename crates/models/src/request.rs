use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Encoding tag of a saved request body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    #[default]
    None,
    Json,
    FormData,
    Urlencoded,
}

impl BodyType {
    pub const ALL: [BodyType; 4] = [BodyType::None, BodyType::Json, BodyType::FormData, BodyType::Urlencoded];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::None => "none",
            BodyType::Json => "json",
            BodyType::FormData => "form-data",
            BodyType::Urlencoded => "urlencoded",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownBodyType(s.to_string()))
    }
}

/// A saved HTTP call definition.
///
/// An empty `collection_id` means the request is uncategorized. An empty `id` on input to the
/// store means "create"; a non-empty one means "update the existing entry".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collection_id: String,
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// Unsaved request: no id, no collection, zeroed timestamps.
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn in_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = collection_id.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>, body_type: BodyType) -> Self {
        self.body = body.into();
        self.body_type = Some(body_type);
        self
    }

    pub fn is_uncategorized(&self) -> bool {
        self.collection_id.is_empty()
    }

    /// URL is checked before name, so a request missing both reports `EmptyUrl`.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.url.is_empty() {
            return Err(ModelError::EmptyUrl);
        }
        if self.name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(())
    }
}
