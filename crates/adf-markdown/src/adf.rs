//! ADF (Atlassian Document Format) node types
//!
//! A deliberately loose model of the ADF JSON tree: every field except `type`
//! may be absent and unknown fields are ignored, so documents produced by newer
//! schema versions still deserialize.
//! Reference: https://developer.atlassian.com/cloud/jira/platform/apis/document/structure/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading an ADF document from JSON
#[derive(Debug, Error)]
pub enum AdfError {
    #[error("Invalid ADF JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected an array of nodes or a document object, found {0}")]
    NotADocument(&'static str),
}

/// A single node of an ADF tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Node tag (`paragraph`, `text`, `bulletList`, ...). Missing tags
    /// deserialize as the empty string and render through the fallback rule.
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Child nodes, absent on leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<DocumentNode>>,
    /// Literal payload of `text` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Formatting marks of `text` nodes, applied in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    /// Node-specific metadata (heading `level`, media `id`/`alt`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

/// A formatting mark attached to a text node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type", default)]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

impl DocumentNode {
    /// Create an empty node with the given tag
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Children of this node; empty when `content` is absent
    pub fn children(&self) -> &[DocumentNode] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Marks of this node; empty when `marks` is absent
    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or_default()
    }

    /// Look up an attribute
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    /// Look up a string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)?.as_str()
    }

    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// Attach children to this node
    pub fn with_content(mut self, content: Vec<DocumentNode>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set an attribute on this node
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

// Convenience constructors
impl DocumentNode {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            node_type: "text".to_string(),
            text: Some(s.into()),
            ..Default::default()
        }
    }

    pub fn marked_text(s: impl Into<String>, marks: &[&str]) -> Self {
        Self {
            marks: Some(marks.iter().map(|m| Mark::new(*m)).collect()),
            ..Self::text(s)
        }
    }

    pub fn paragraph(children: Vec<DocumentNode>) -> Self {
        Self::new("paragraph").with_content(children)
    }

    pub fn heading(level: u8, children: Vec<DocumentNode>) -> Self {
        Self::new("heading")
            .with_attr("level", level)
            .with_content(children)
    }

    pub fn bullet_list(items: Vec<DocumentNode>) -> Self {
        Self::new("bulletList").with_content(items)
    }

    pub fn ordered_list(items: Vec<DocumentNode>) -> Self {
        Self::new("orderedList").with_content(items)
    }

    pub fn list_item(children: Vec<DocumentNode>) -> Self {
        Self::new("listItem").with_content(children)
    }

    pub fn rule() -> Self {
        Self::new("rule")
    }

    pub fn media(id: impl Into<String>, alt: Option<&str>) -> Self {
        let id: String = id.into();
        let node = Self::new("media").with_attr("id", id);
        match alt {
            Some(alt) => node.with_attr("alt", alt),
            None => node,
        }
    }

    pub fn media_single(media: DocumentNode) -> Self {
        Self::new("mediaSingle").with_content(vec![media])
    }

    /// ADF root node (`{"type": "doc", "content": [...]}`)
    pub fn doc(children: Vec<DocumentNode>) -> Self {
        Self::new("doc").with_content(children)
    }
}

impl Mark {
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: None,
        }
    }
}

/// Parse an ADF document from JSON text
///
/// Accepts either a top-level array of nodes or a single node object
/// (typically the `doc` root), which becomes a one-element sequence.
pub fn parse_document(json: &str) -> Result<Vec<DocumentNode>, AdfError> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

/// Convert an already-deserialized JSON value into ADF nodes
pub fn from_value(value: Value) -> Result<Vec<DocumentNode>, AdfError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(AdfError::NotADocument(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
