//! Free-form provenance attributes carried next to the core LU fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute names owned by the lexicon itself. Extra attributes may not
/// reuse them.
pub const RESERVED_LU_ATTRIBUTES: &[&str] = &[
    "ID",
    "name",
    "POS",
    "status",
    "lemmaID",
    "cBy",
    "cDate",
    "lu_type",
    "incorporatedFE",
    "frameID",
    "frameName",
    "frame",
    "totalAnnotated",
    "numAnnotInstances",
    "hasAnnotation",
];

/// Open extension bag of `key -> value` attributes, e.g. links to entries of
/// an external lexical resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraAttributes(BTreeMap<String, String>);

impl ExtraAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys that collide with a reserved core attribute.
    pub fn reserved_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| RESERVED_LU_ATTRIBUTES.contains(key))
            .collect()
    }
}

impl FromIterator<(String, String)> for ExtraAttributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
