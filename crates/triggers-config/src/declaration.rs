//! Declaration tree parsing.
//!
//! A declaration is read into plain nodes first; no meaning is attached to
//! node names here. The resolver decides which nodes are settings and which
//! declare entities.

use kdl::{KdlDocument, KdlNode, KdlValue};
use triggers_core::Value;

use crate::ConfigResult;

/// Name of the block holding all trigger declarations.
pub const TRIGGERS_BLOCK: &str = "triggers";

/// One declared node: a name, its values, and an optional children block.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationNode {
    pub name: String,
    /// Positional values, e.g. `"5"` in `versionHistorySize "5"`.
    pub arguments: Vec<Value>,
    /// Named values, e.g. `size=5`.
    pub properties: Vec<(String, Value)>,
    /// `None` when the node has no `{ ... }` block at all.
    pub children: Option<Vec<DeclarationNode>>,
}

impl DeclarationNode {
    /// A node with no values and no block.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            properties: Vec::new(),
            children: None,
        }
    }

    pub fn with_argument(mut self, value: impl Into<Value>) -> Self {
        self.arguments.push(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DeclarationNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn children(&self) -> &[DeclarationNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// The first value attached to the node, positional or named.
    pub fn first_value(&self) -> Option<&Value> {
        self.arguments
            .first()
            .or_else(|| self.properties.first().map(|(_, v)| v))
    }

    pub fn has_values(&self) -> bool {
        !self.arguments.is_empty() || !self.properties.is_empty()
    }
}

/// Every `triggers` block of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    pub blocks: Vec<DeclarationNode>,
}

/// Parse a trigger declaration from KDL text.
///
/// Top-level nodes other than `triggers` are ignored.
pub fn parse_declaration(kdl: &str) -> ConfigResult<Declaration> {
    let doc: KdlDocument = kdl.parse()?;

    let blocks = doc
        .nodes()
        .iter()
        .filter(|node| node.name().value() == TRIGGERS_BLOCK)
        .map(convert_node)
        .collect();

    Ok(Declaration { blocks })
}

fn convert_node(node: &KdlNode) -> DeclarationNode {
    let mut arguments = Vec::new();
    let mut properties = Vec::new();

    for entry in node.entries() {
        let value = convert_value(entry.value());
        match entry.name() {
            Some(name) => properties.push((name.value().to_string(), value)),
            None => arguments.push(value),
        }
    }

    DeclarationNode {
        name: node.name().value().to_string(),
        arguments,
        properties,
        children: node
            .children()
            .map(|doc| doc.nodes().iter().map(convert_node).collect()),
    }
}

fn convert_value(value: &KdlValue) -> Value {
    if let Some(s) = value.as_string() {
        Value::String(s.to_string())
    } else if let Some(i) = value.as_integer() {
        Value::Integer(i)
    } else if let Some(f) = value.as_float() {
        Value::Float(f)
    } else if let Some(b) = value.as_bool() {
        Value::Bool(b)
    } else {
        Value::Null
    }
}
