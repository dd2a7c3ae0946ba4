use std::collections::BTreeMap;

use serde::Serialize;

/// Key under which an element's attributes are stored.
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Key under which an element's trimmed character data is stored.
pub const TEXT_KEY: &str = "#text";

/// Generic structural projection of an XML element.
/// XML 元素的通用結構化投影。
///
/// Keys are child element local names plus the reserved [`ATTRIBUTES_KEY`] and
/// [`TEXT_KEY`]. Keys are kept sorted so the JSON rendering is deterministic.
/// The projection is lossy: mixed content is flattened, ordering between
/// different sibling names is dropped, and an element literally named `#text`
/// would collide with character data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StructuralNode {
    entries: BTreeMap<String, NodeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeValue {
    Node(StructuralNode),
    /// Two or more sibling elements sharing one name, in document order.
    Array(Vec<StructuralNode>),
    Text(String),
    Attributes(BTreeMap<String, String>),
}

impl StructuralNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&NodeValue> {
        self.entries.get(key)
    }

    /// Returns the child element `name` when exactly one such sibling exists.
    pub fn child(&self, name: &str) -> Option<&StructuralNode> {
        match self.entries.get(name) {
            Some(NodeValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.entries.get(TEXT_KEY) {
            Some(NodeValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        match self.entries.get(ATTRIBUTES_KEY) {
            Some(NodeValue::Attributes(attributes)) => Some(attributes),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: NodeValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Adds a decoded child element, promoting repeated names to an array.
    pub(crate) fn merge_child(&mut self, name: &str, child: StructuralNode) {
        let merged = match self.entries.remove(name) {
            Some(NodeValue::Node(previous)) => NodeValue::Array(vec![previous, child]),
            Some(NodeValue::Array(mut items)) => {
                items.push(child);
                NodeValue::Array(items)
            }
            _ => NodeValue::Node(child),
        };
        self.entries.insert(name.to_string(), merged);
    }
}
