//! The document type tying everything together: configuration, the
//! deserialize path (parse, extract comments, map resources), and the
//! serialize path (rebuild the tree, render).

use std::collections::HashMap;
use std::rc::Rc;

use crate::comments;
use crate::error::Error;
use crate::key::{normalize_key, split_key, unescape_segment};
use crate::types::{Resource, ResourceValue, TranslationSet};
use crate::yaml::{self, EmitOptions, Value};

/// Locale applied when neither the configuration nor a companion source
/// document supplies one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Per-leaf predicate deciding whether a key/value pair becomes a
/// resource. Called with the normalized key path and the raw value.
pub type ResourceFilter = Box<dyn Fn(&str, &Value) -> bool>;

/// A YAML document holding a set of localizable resources.
///
/// Deserializing a document with no companion source treats every value as
/// a source string. With a companion linked, values become targets and the
/// corresponding source strings are looked up in the companion by key.
///
/// # Example
///
/// ```rust
/// use yamlres::Document;
///
/// let mut doc = Document::builder().path_name("i18n/en.yml").build();
/// doc.deserialize("foo:\n  bar: hello\n")?;
///
/// let resource = doc.get_resource("foo.bar").expect("mapped resource");
/// assert_eq!(resource.source.as_ref().and_then(|v| v.as_str()), Some("hello"));
/// # Ok::<(), yamlres::Error>(())
/// ```
pub struct Document {
    source_yaml: Option<Rc<Document>>,
    source_locale: String,
    locale: String,
    path_name: Option<String>,
    project: Option<String>,
    context: Option<String>,
    state: Option<String>,
    datatype: Option<String>,
    flavor: Option<String>,
    comment_prefix: Option<String>,
    filter: Option<ResourceFilter>,
    comments: HashMap<String, String>,
    set: TranslationSet,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("source_locale", &self.source_locale)
            .field("locale", &self.locale)
            .field("path_name", &self.path_name)
            .field("project", &self.project)
            .field("context", &self.context)
            .field("state", &self.state)
            .field("datatype", &self.datatype)
            .field("flavor", &self.flavor)
            .field("comment_prefix", &self.comment_prefix)
            .field("has_filter", &self.filter.is_some())
            .field("resources", &self.set.len())
            .finish()
    }
}

/// Builder for [`Document`]. All settings are optional.
#[derive(Default)]
pub struct DocumentBuilder {
    source_yaml: Option<Rc<Document>>,
    source_locale: Option<String>,
    locale: Option<String>,
    path_name: Option<String>,
    project: Option<String>,
    context: Option<String>,
    state: Option<String>,
    datatype: Option<String>,
    flavor: Option<String>,
    comment_prefix: Option<String>,
    filter: Option<ResourceFilter>,
}

impl DocumentBuilder {
    /// Links the companion source document. Strings read from the built
    /// document are treated as translations of the companion's strings.
    pub fn source_yaml(mut self, source: Rc<Document>) -> Self {
        self.source_yaml = Some(source);
        self
    }

    /// Sets the source locale explicitly. Defaults to the companion
    /// document's locale, or "en-US" with no companion.
    pub fn source_locale(mut self, locale: impl Into<String>) -> Self {
        self.source_locale = Some(locale.into());
        self
    }

    /// Sets the locale of this document's own values.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Path stamped onto every produced resource.
    pub fn path_name(mut self, path_name: impl Into<String>) -> Self {
        self.path_name = Some(path_name.into());
        self
    }

    /// Project identifier stamped onto every produced resource; also the
    /// project that [`Document::add_resource`] requires.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    pub fn flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }

    /// Prefix stripped from comments before they are attached to
    /// resources. A comment without the prefix is attached unmodified.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = Some(prefix.into());
        self
    }

    /// Filter consulted for every leaf before a resource is created.
    /// Returning false skips the entry entirely.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn build(self) -> Document {
        let source_locale = self
            .source_locale
            .or_else(|| {
                self.source_yaml
                    .as_ref()
                    .map(|source| source.locale().to_string())
            })
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let locale = self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        Document {
            source_yaml: self.source_yaml,
            source_locale,
            locale,
            path_name: self.path_name,
            project: self.project,
            context: self.context,
            state: self.state,
            datatype: self.datatype,
            flavor: self.flavor,
            comment_prefix: self.comment_prefix,
            filter: self.filter,
            comments: HashMap::new(),
            set: TranslationSet::new(),
        }
    }
}

impl Document {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// The locale of this document's own values.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    /// The path used to construct all resources.
    pub fn path(&self) -> Option<&str> {
        self.path_name.as_deref()
    }

    pub fn comment_prefix(&self) -> Option<&str> {
        self.comment_prefix.as_deref()
    }

    /// Parses YAML text and populates the resource set, one resource per
    /// leaf scalar or array.
    ///
    /// The comment map and the resource sequence index are rebuilt from
    /// scratch on every call; the resource set accumulates across calls.
    pub fn deserialize(&mut self, content: &str) -> Result<(), Error> {
        let tree = yaml::parse_tree(content)?;
        let value = Value::from_node(&tree);
        self.comments = comments::extract(Some(&tree));

        let mut resources = Vec::new();
        match &value {
            Value::Mapping(entries) => self.collect_resources(None, entries, &mut resources),
            Value::Sequence(items) => {
                // a root-level sequence behaves like a mapping keyed by index
                let entries: Vec<(String, Value)> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item.clone()))
                    .collect();
                self.collect_resources(None, &entries, &mut resources);
            }
            _ => {}
        }
        self.set.add_all(resources);
        Ok(())
    }

    fn collect_resources(
        &self,
        prefix: Option<&str>,
        entries: &[(String, Value)],
        out: &mut Vec<Resource>,
    ) {
        for (key, value) in entries {
            let reskey = normalize_key(prefix, key);
            match value {
                Value::Mapping(nested) => self.collect_resources(Some(&reskey), nested, out),
                Value::Sequence(items) => {
                    if !self.accepts(&reskey, value) {
                        continue;
                    }
                    let items = items.iter().filter_map(Value::scalar_string).collect();
                    let resource =
                        self.build_resource(reskey, ResourceValue::Array(items), out.len());
                    out.push(resource);
                }
                scalar => {
                    if !self.accepts(&reskey, value) {
                        continue;
                    }
                    let text = scalar.scalar_string().unwrap_or_default();
                    let resource =
                        self.build_resource(reskey, ResourceValue::String(text), out.len());
                    out.push(resource);
                }
            }
        }
    }

    fn accepts(&self, reskey: &str, value: &Value) -> bool {
        match &self.filter {
            Some(filter) => filter(reskey, value),
            None => true,
        }
    }

    fn build_resource(&self, reskey: String, value: ResourceValue, index: usize) -> Resource {
        let source_resource = self
            .source_yaml
            .as_ref()
            .and_then(|source| source.get_resource(&reskey));

        let mut resource = Resource {
            auto_key: true,
            index,
            path_name: self
                .path_name
                .clone()
                .or_else(|| source_resource.and_then(|r| r.path_name.clone())),
            project: self
                .project
                .clone()
                .or_else(|| source_resource.and_then(|r| r.project.clone())),
            datatype: self
                .datatype
                .clone()
                .or_else(|| source_resource.and_then(|r| r.datatype.clone())),
            flavor: self
                .flavor
                .clone()
                .or_else(|| source_resource.and_then(|r| r.flavor.clone())),
            context: self
                .context
                .clone()
                .or_else(|| source_resource.and_then(|r| r.context.clone())),
            state: self.state.clone(),
            ..Default::default()
        };

        if self.locale == self.source_locale {
            resource.source_locale = Some(self.locale.clone());
            resource.source = Some(value);
        } else {
            if let Some(source_resource) = source_resource {
                resource.source_locale = source_resource.source_locale.clone();
                resource.source = source_resource.source.clone();
            }
            resource.target_locale = Some(self.locale.clone());
            resource.target = Some(value);
        }

        resource.comment = self.comment_for(&reskey);
        resource.key = reskey;
        resource
    }

    /// Looks up the comment for a key, trims it, and strips the configured
    /// prefix when the comment starts with it. A comment that does not
    /// start with the prefix is attached as-is.
    fn comment_for(&self, reskey: &str) -> Option<String> {
        let comment = self.comments.get(reskey)?.trim();
        match &self.comment_prefix {
            Some(prefix) if comment.starts_with(prefix.as_str()) => {
                Some(comment[prefix.len()..].trim().to_string())
            }
            _ => Some(comment.to_string()),
        }
    }

    /// Serializes the resources back into YAML text with lexically sorted
    /// keys. A set with no pending changes serializes to `{}` plus a
    /// newline, as does an empty set.
    pub fn serialize(&self) -> String {
        let mut root: Vec<(String, Value)> = Vec::new();
        if self.set.is_dirty() {
            for resource in self.set.get_all() {
                let Some(text) = resource.text() else {
                    continue;
                };
                let value = match text {
                    ResourceValue::String(s) => Value::String(s.clone()),
                    ResourceValue::Array(items) => Value::Sequence(
                        items.iter().cloned().map(Value::String).collect(),
                    ),
                };
                let parts = split_key(&resource.key);
                insert_at_path(&mut root, &parts, value);
            }
        }
        yaml::emit(
            &Value::Mapping(root),
            &EmitOptions {
                sort_keys: true,
                double_quoted_as_json: true,
            },
        )
    }

    /// The first resource with the given key, if any.
    pub fn get_resource(&self, reskey: &str) -> Option<&Resource> {
        self.set.get(reskey)
    }

    /// All resources in this document, in document order.
    pub fn get_resources(&self) -> &[Resource] {
        self.set.get_all()
    }

    pub fn get_translation_set(&self) -> &TranslationSet {
        &self.set
    }

    pub fn get_translation_set_mut(&mut self) -> &mut TranslationSet {
        &mut self.set
    }

    /// Adds a resource, provided its project matches this document's
    /// configured project. Returns whether the resource was accepted.
    pub fn add_resource(&mut self, resource: Resource) -> bool {
        if resource.project == self.project {
            self.set.add(resource);
            true
        } else {
            false
        }
    }

    /// Adds resources until one is rejected. Returns true only when every
    /// resource was accepted; resources after a rejection are not added.
    pub fn add_resources(&mut self, resources: Vec<Resource>) -> bool {
        for resource in resources {
            if !self.add_resource(resource) {
                return false;
            }
        }
        true
    }
}

/// Walks or creates intermediate mappings for every path segment but the
/// last, then writes the value at the leaf. Segments are unescaped as they
/// are written, so the tree carries literal dots again. A resource whose
/// path runs through an existing non-mapping value is dropped; a leaf
/// written twice keeps the later value.
fn insert_at_path(entries: &mut Vec<(String, Value)>, parts: &[String], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            let leaf = unescape_segment(leaf);
            match entries.iter_mut().find(|(k, _)| *k == leaf) {
                Some(entry) => entry.1 = value,
                None => entries.push((leaf, value)),
            }
        }
        [head, rest @ ..] => {
            let head = unescape_segment(head);
            let index = match entries.iter().position(|(k, _)| *k == head) {
                Some(index) => index,
                None => {
                    entries.push((head, Value::Mapping(Vec::new())));
                    entries.len() - 1
                }
            };
            if let Value::Mapping(nested) = &mut entries[index].1 {
                insert_at_path(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let doc = Document::builder().build();
        assert_eq!(doc.locale(), DEFAULT_LOCALE);
        assert_eq!(doc.source_locale(), DEFAULT_LOCALE);
        assert!(doc.path().is_none());
        assert!(doc.comment_prefix().is_none());
    }

    #[test]
    fn test_source_locale_inherited_from_companion() {
        let mut source = Document::builder().locale("en-GB").build();
        source.deserialize("a: hello\n").unwrap();
        let doc = Document::builder()
            .locale("de-DE")
            .source_yaml(Rc::new(source))
            .build();
        assert_eq!(doc.source_locale(), "en-GB");
    }

    #[test]
    fn test_insert_at_path_conflict_drops_resource() {
        let mut root = Vec::new();
        insert_at_path(
            &mut root,
            &["a".to_string()],
            Value::String("scalar".to_string()),
        );
        insert_at_path(
            &mut root,
            &["a".to_string(), "b".to_string()],
            Value::String("nested".to_string()),
        );
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].1, Value::String("scalar".to_string()));
    }

    #[test]
    fn test_insert_at_path_leaf_overwrites() {
        let mut root = Vec::new();
        insert_at_path(&mut root, &["a".to_string()], Value::String("x".to_string()));
        insert_at_path(&mut root, &["a".to_string()], Value::String("y".to_string()));
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].1, Value::String("y".to_string()));
    }

    #[test]
    fn test_deserialize_root_sequence_uses_index_keys() {
        let mut doc = Document::builder().build();
        doc.deserialize("- one\n- two\n").unwrap();
        let resources = doc.get_resources();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].key, "0");
        assert_eq!(resources[1].key, "1");
    }

    #[test]
    fn test_deserialize_twice_restarts_index() {
        let mut doc = Document::builder().build();
        doc.deserialize("a: one\nb: two\n").unwrap();
        doc.deserialize("c: three\n").unwrap();
        let resources = doc.get_resources();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[2].key, "c");
        assert_eq!(resources[2].index, 0);
    }
}
