//! Wikidata API response types
//! Mapping of the `wbsearchentities` and `wbgetentities` payloads we consume
//!
//! Reference: https://www.wikidata.org/w/api.php?action=help&modules=wbgetentities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Property id of the "instance of" relation
pub const INSTANCE_OF: &str = "P31";

/// `action=wbsearchentities` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchEntitiesResponse {
    /// `1` on success; absent on API errors
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub search: Vec<SearchResultItem>,
}

impl SearchEntitiesResponse {
    /// Whether the API flagged this response as successful
    pub fn is_success(&self) -> bool {
        match &self.success {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }
}

/// One hit from `wbsearchentities`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// `action=wbgetentities` response
///
/// `entities` is required: an API error body lacks it and fails to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesResponse {
    pub entities: BTreeMap<String, EntityRecord>,
}

/// Detailed entity record
///
/// `labels` and `claims` stay untyped. Wikibase serializes empty maps as `[]`
/// and snak values vary by datatype, so lookups walk the JSON and treat any
/// missing level as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub missing: Option<String>,
    #[serde(default)]
    pub labels: Value,
    #[serde(default)]
    pub claims: Value,
}

impl EntityRecord {
    /// Target id of the first "instance of" claim
    pub fn instance_of(&self) -> Option<&str> {
        self.claims
            .get(INSTANCE_OF)?
            .get(0)?
            .get("mainsnak")?
            .get("datavalue")?
            .get("value")?
            .get("id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }

    /// Label in the given language
    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels.get(language)?.get("value")?.as_str()
    }

    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }
}

/// A resolved search result
///
/// `entity_type` serializes as `type` and stays empty until type enrichment
/// fills it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub url: String,
    pub label: String,
    pub aliases: Vec<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl From<SearchResultItem> for SearchHit {
    fn from(item: SearchResultItem) -> Self {
        Self {
            id: item.id,
            url: item.url,
            label: item.label,
            aliases: item.aliases,
            description: item.description,
            entity_type: String::new(),
        }
    }
}

impl SearchHit {
    /// Fold another hit for the same id into this one
    ///
    /// Non-empty fields already present win; aliases are unioned in order.
    pub fn merge(&mut self, other: SearchHit) {
        debug_assert_eq!(self.id, other.id);

        if self.url.is_empty() {
            self.url = other.url;
        }
        if self.label.is_empty() {
            self.label = other.label;
        }
        if self.description.is_empty() {
            self.description = other.description;
        }
        if self.entity_type.is_empty() {
            self.entity_type = other.entity_type;
        }
        for alias in other.aliases {
            if !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
    }
}
