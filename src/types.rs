//! Core resource types: the flat localizable [`Resource`] and the ordered
//! [`TranslationSet`] that collects them.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The payload of a resource: a single string or an ordered array of
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    String(String),
    Array(Vec<String>),
}

impl ResourceValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResourceValue::String(s) => Some(s),
            ResourceValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            ResourceValue::String(_) => None,
            ResourceValue::Array(items) => Some(items),
        }
    }
}

impl From<&str> for ResourceValue {
    fn from(value: &str) -> Self {
        ResourceValue::String(value.to_string())
    }
}

/// The two kinds of resource this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResType {
    String,
    Array,
}

impl std::fmt::Display for ResType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResType::String => write!(f, "string"),
            ResType::Array => write!(f, "array"),
        }
    }
}

/// One localizable unit extracted from a document, keyed by its position
/// in the tree.
///
/// A resource carries a source value, a target value, or both. One with
/// neither has no text and is skipped at serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resource {
    /// The dot-joined key path, with literal dots escaped.
    pub key: String,

    /// True when the key was derived from document structure rather than
    /// assigned by an author.
    #[serde(default)]
    pub auto_key: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<ResourceValue>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<ResourceValue>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_locale: Option<String>,

    /// Translator's comment.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datatype: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flavor: Option<String>,

    /// Document-order sequence number, assigned during deserialization.
    #[serde(default)]
    pub index: usize,
}

impl Resource {
    /// The resource kind, derived from whichever value is populated.
    pub fn res_type(&self) -> Option<ResType> {
        self.source
            .as_ref()
            .or(self.target.as_ref())
            .map(|value| match value {
                ResourceValue::String(_) => ResType::String,
                ResourceValue::Array(_) => ResType::Array,
            })
    }

    /// The text to serialize: the target when present, else the source.
    pub fn text(&self) -> Option<&ResourceValue> {
        self.target.as_ref().or(self.source.as_ref())
    }
}

/// An ordered, appendable collection of resources with a dirty flag.
///
/// The set never deduplicates; callers that add the same key twice get
/// both entries, and key lookups return the first match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationSet {
    resources: Vec<Resource>,
    #[serde(skip)]
    dirty: bool,
}

impl TranslationSet {
    pub fn new() -> Self {
        TranslationSet::default()
    }

    /// Appends a resource and marks the set dirty.
    pub fn add(&mut self, resource: Resource) {
        self.resources.push(resource);
        self.dirty = true;
    }

    /// Appends every resource from `resources`.
    pub fn add_all<I: IntoIterator<Item = Resource>>(&mut self, resources: I) {
        for resource in resources {
            self.add(resource);
        }
    }

    /// All resources in insertion order.
    pub fn get_all(&self) -> &[Resource] {
        &self.resources
    }

    /// The first resource with the given key, if any.
    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.key == key)
    }

    /// All resources matching a predicate, in insertion order.
    pub fn get_by<F>(&self, predicate: F) -> Vec<&Resource>
    where
        F: Fn(&Resource) -> bool,
    {
        self.resources
            .iter()
            .filter(|resource| predicate(resource))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Whether resources were added since the set was last marked clean.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Serializes the resources to a JSON cache string.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(&self.resources).map_err(Error::Parse)
    }

    /// Loads a set back from its JSON cache form. The loaded set starts
    /// clean.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let resources: Vec<Resource> = serde_json::from_str(json).map_err(Error::Parse)?;
        Ok(TranslationSet {
            resources,
            dirty: false,
        })
    }
}
