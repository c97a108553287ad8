//! Arena-backed concrete syntax tree.
//!
//! Nodes live in a flat arena and refer to each other by `u32` id, so
//! handles held by callers stay valid across the one mutation this tree
//! supports: [`Cst::detach`], which splices a zero-length placeholder into
//! a parent and disconnects the original subtree.

use serde_json::Value;

use crate::error::ParseError;

pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    /// A `key: value` pair inside an object. Children are the key string
    /// node and, when present, the value node.
    Property,
    String,
    Number,
    Bool,
    Null,
    /// Zero-length placeholder left behind by [`Cst::detach`].
    Elided,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub offset: usize,
    pub length: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Decoded value for scalar nodes, cached at parse time. `None` for
    /// composites and for scalars whose text failed to decode.
    pub scalar: Option<Value>,
}

impl Node {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.end()
    }
}

/// One structural step: an object property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

#[derive(Debug, Default)]
pub struct Cst {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    errors: Vec<ParseError>,
}

impl Cst {
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        (self.nodes.len() - 1) as NodeId
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    pub(crate) fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Key text of a `Property` node.
    pub fn property_key(&self, property: NodeId) -> Option<&str> {
        let node = self.node(property);
        if node.kind != NodeKind::Property {
            return None;
        }
        let key = self.node(*node.children.first()?);
        key.scalar.as_ref()?.as_str()
    }

    /// Value node of a `Property` node, when the source has one.
    pub fn property_value(&self, property: NodeId) -> Option<NodeId> {
        let node = self.node(property);
        if node.kind != NodeKind::Property {
            return None;
        }
        node.children.get(1).copied()
    }

    /// Property node for a property name within an object node. Present
    /// even when the property has no value node (partial input).
    pub fn object_property(&self, object: NodeId, key: &str) -> Option<NodeId> {
        let node = self.node(object);
        if node.kind != NodeKind::Object {
            return None;
        }
        node.children
            .iter()
            .copied()
            .find(|&property| self.property_key(property) == Some(key))
    }

    /// Value node for a property name within an object node.
    pub fn object_entry(&self, object: NodeId, key: &str) -> Option<NodeId> {
        self.object_property(object, key)
            .and_then(|property| self.property_value(property))
    }

    /// Walks structural steps from `from`, returning the addressed node.
    /// Returns `None` on any miss: wrong container kind, unknown key, or
    /// index out of bounds.
    pub fn find_at_location(&self, from: NodeId, path: &[PathStep]) -> Option<NodeId> {
        let mut current = from;
        for step in path {
            current = match step {
                PathStep::Key(key) => self.object_entry(current, key)?,
                PathStep::Index(index) => {
                    let node = self.node(current);
                    if node.kind != NodeKind::Array {
                        return None;
                    }
                    *node.children.get(*index)?
                }
            };
        }
        Some(current)
    }

    /// Deepest node under `from` whose span contains `offset`.
    pub fn find_at_offset(&self, from: NodeId, offset: usize) -> Option<NodeId> {
        let node = self.node(from);
        if !node.contains(offset) {
            return None;
        }
        for &child in &node.children {
            if self.node(child).offset > offset {
                break;
            }
            if let Some(found) = self.find_at_offset(child, offset) {
                return Some(found);
            }
        }
        Some(from)
    }

    /// Structural path from the tree root down to `id`. A property's key
    /// node and value node both map to the property's own step.
    pub fn path(&self, id: NodeId) -> Vec<PathStep> {
        let mut steps = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            match self.node(parent).kind {
                NodeKind::Property => {
                    if let Some(key) = self.property_key(parent) {
                        steps.push(PathStep::Key(key.to_string()));
                    }
                }
                NodeKind::Array => {
                    if let Some(index) = self
                        .node(parent)
                        .children
                        .iter()
                        .position(|&child| child == current)
                    {
                        steps.push(PathStep::Index(index));
                    }
                }
                _ => {}
            }
            current = parent;
        }
        steps.reverse();
        steps
    }

    /// Disconnects `id` from its structural parent, leaving a zero-length
    /// [`NodeKind::Elided`] placeholder at the same offset in its place.
    ///
    /// This is the one mutation the tree supports, and it is one-way: the
    /// detached subtree keeps its arena slots and becomes a root of its
    /// own, while any handle into the old parent now sees the placeholder.
    /// Detaching a root or an already-detached node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).parent else {
            return false;
        };
        let offset = self.node(id).offset;
        let Some(slot) = self.node(parent).children.iter().position(|&c| c == id) else {
            return false;
        };
        let placeholder = self.push(Node {
            kind: NodeKind::Elided,
            offset,
            length: 0,
            parent: Some(parent),
            children: Vec::new(),
            scalar: None,
        });
        self.node_mut(parent).children[slot] = placeholder;
        self.node_mut(id).parent = None;
        true
    }
}
