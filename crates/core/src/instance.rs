//! The addressable instance view.
//!
//! An [`Instance`] wraps one location in a parsed JSONC document: a node
//! (possibly absent), the JSON Pointer identifying it relative to the view
//! root, and the annotation store accumulated so far. Instances are cheap
//! handles meant to be created profusely during an evaluation pass; every
//! navigation or annotation operation returns a new Instance and leaves the
//! receiver untouched. The one deliberate exception is [`Instance::as_embedded`],
//! which performs the tree's single supported mutation.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use json_lens_json_pointer::{append_token, decode_pointer, encode_pointer, is_valid_index};
use json_lens_jsonc::{Cst, NodeId, NodeKind, ParseError, PathStep, Position, TextIndex};

use crate::annotations::AnnotationStore;
use crate::error::InstanceError;
use crate::keywords::{Keywords, DIALECT_2020_12};

/// JSON type of an addressed location. `Undefined` means the location holds
/// no value: a lookup miss, a partial parse, or an elided slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
    Undefined,
}

#[derive(Debug)]
struct DocumentState {
    index: TextIndex,
    // Read-only except for detach, which fires at most once per embedding
    cst: RefCell<Cst>,
    keywords: Keywords,
}

#[derive(Debug, Clone)]
pub struct Instance {
    doc: Rc<DocumentState>,
    /// Root of this view. Differs from the document root after embedding;
    /// pointers are always relative to it.
    root: Option<NodeId>,
    node: Option<NodeId>,
    pointer: String,
    annotations: Rc<AnnotationStore>,
    dialect: Rc<str>,
}

impl Instance {
    /// Parses a JSONC document and returns the root Instance, using the
    /// standard keyword registry and the 2020-12 dialect.
    pub fn parse(text: impl Into<String>) -> Self {
        Self::parse_with(text, DIALECT_2020_12, Keywords::standard())
    }

    /// Parses a JSONC document under an explicit dialect and registry.
    pub fn parse_with(
        text: impl Into<String>,
        dialect: impl Into<String>,
        keywords: Keywords,
    ) -> Self {
        let index = TextIndex::new(text);
        let cst = json_lens_jsonc::parse(index.text());
        let root = cst.root();
        Self {
            doc: Rc::new(DocumentState {
                index,
                cst: RefCell::new(cst),
                keywords,
            }),
            root,
            node: root,
            pointer: String::new(),
            annotations: Rc::new(AnnotationStore::new()),
            dialect: Rc::from(dialect.into()),
        }
    }

    /// New Instance sharing this one's document, root, annotations, and
    /// dialect.
    fn derive(&self, node: Option<NodeId>, pointer: String) -> Self {
        Self {
            doc: Rc::clone(&self.doc),
            root: self.root,
            node,
            pointer,
            annotations: Rc::clone(&self.annotations),
            dialect: Rc::clone(&self.dialect),
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Diagnostics collected while parsing the underlying document.
    pub fn parse_errors(&self) -> Vec<ParseError> {
        self.doc.cst.borrow().errors().to_vec()
    }

    pub fn kind(&self) -> JsonKind {
        let Some(node) = self.node else {
            return JsonKind::Undefined;
        };
        match self.doc.cst.borrow().node(node).kind {
            NodeKind::Object => JsonKind::Object,
            NodeKind::Array => JsonKind::Array,
            NodeKind::String => JsonKind::String,
            NodeKind::Number => JsonKind::Number,
            NodeKind::Bool => JsonKind::Boolean,
            NodeKind::Null => JsonKind::Null,
            NodeKind::Property | NodeKind::Elided => JsonKind::Undefined,
        }
    }

    /// Materializes the JSON value at this location. `None` when the
    /// location holds no value.
    pub fn value(&self) -> Option<Value> {
        let node = self.node?;
        let cst = self.doc.cst.borrow();
        materialize(&cst, self.doc.index.text(), node)
    }

    /// True iff this is an object with a property named `key`, whether or
    /// not the property has a value node.
    pub fn has(&self, key: &str) -> bool {
        match self.node {
            Some(node) => self.doc.cst.borrow().object_property(node, key).is_some(),
            None => false,
        }
    }

    /// Descends into an object property. A miss (unknown property, or a
    /// non-object receiver) yields an absent Instance whose pointer is
    /// still extended by `key`, so pointer composition keeps working.
    pub fn step(&self, key: &str) -> Self {
        let pointer = append_token(&self.pointer, key);
        let node = self
            .node
            .and_then(|node| self.doc.cst.borrow().object_entry(node, key));
        self.derive(node, pointer)
    }

    /// Lazy `(key, value)` Instance pairs of an object, in source order.
    /// Empty for anything that is not an object. Each call returns an
    /// independent cursor.
    pub fn entries(&self) -> Entries {
        Entries {
            properties: self.child_ids(NodeKind::Object),
            instance: self.clone(),
            index: 0,
        }
    }

    /// Lazy element Instances of an array, in index order. Empty for
    /// anything that is not an array.
    pub fn iter(&self) -> Elements {
        Elements {
            children: self.child_ids(NodeKind::Array),
            instance: self.clone(),
            index: 0,
        }
    }

    pub fn keys(&self) -> Keys {
        Keys(self.entries())
    }

    pub fn values(&self) -> Values {
        Values(self.entries())
    }

    fn child_ids(&self, expected: NodeKind) -> Vec<NodeId> {
        match self.node {
            Some(node) => {
                let cst = self.doc.cst.borrow();
                let node = cst.node(node);
                if node.kind == expected {
                    node.children.clone()
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }

    /// Element count of an array; `None` for everything else. Not zero:
    /// non-arrays have no length at all.
    pub fn length(&self) -> Option<usize> {
        let node = self.node?;
        let cst = self.doc.cst.borrow();
        let node = cst.node(node);
        (node.kind == NodeKind::Array).then(|| node.children.len())
    }

    /// Resolves a same-document fragment reference (`#<pointer>`) against
    /// the document root. Misses yield an absent Instance; only a
    /// non-fragment reference or a malformed pointer is an error.
    pub fn get(&self, reference: &str) -> Result<Self, InstanceError> {
        let Some(fragment) = reference.strip_prefix('#') else {
            return Err(InstanceError::Resolution {
                reference: reference.to_string(),
            });
        };
        let tokens = decode_pointer(fragment)?;
        let cst = self.doc.cst.borrow();
        let doc_root = cst.root();
        let node = doc_root.and_then(|root| resolve_tokens(&cst, root, &tokens));
        drop(cst);
        let mut resolved = self.derive(node, fragment.to_string());
        resolved.root = doc_root;
        Ok(resolved)
    }

    /// Structural parent of the current node, keeping the current pointer.
    ///
    /// This walks the tree, not the pointer: for an object member the
    /// parent is the enclosing property node, and the returned Instance
    /// still reports the child's pointer. It exists for embedding and
    /// position bookkeeping; pointer-level navigation should go through
    /// [`Instance::get`].
    pub fn parent(&self) -> Self {
        let parent = self
            .node
            .and_then(|node| self.doc.cst.borrow().node(node).parent);
        self.derive(parent, self.pointer.clone())
    }

    /// Records a keyword output at the current pointer. The keyword is
    /// resolved under this Instance's dialect; the value is prepended to
    /// the list already recorded for that keyword. Returns a new Instance;
    /// the receiver's view of the store is unchanged.
    pub fn annotate(&self, keyword: &str, value: Value) -> Self {
        let id = self.doc.keywords.resolve(keyword, &self.dialect);
        let store = self.annotations.with_prepended(&self.pointer, &id, value);
        let mut annotated = self.derive(self.node, self.pointer.clone());
        annotated.annotations = Rc::new(store);
        annotated
    }

    /// The values recorded for a keyword at the current pointer, most
    /// recent first. Empty when nothing was recorded.
    pub fn annotation(&self, keyword: &str, dialect: &str) -> &[Value] {
        let id = self.doc.keywords.resolve(keyword, dialect);
        self.annotations.get(&self.pointer, &id)
    }

    /// Instances for every pointer carrying a value under the resolved
    /// keyword, resolved against the document root.
    pub fn annotated_with(&self, keyword: &str, dialect: &str) -> Vec<Self> {
        let id = self.doc.keywords.resolve(keyword, dialect);
        let pointers: Vec<String> = self
            .annotations
            .pointers_with(&id)
            .map(str::to_string)
            .collect();
        pointers
            .into_iter()
            .filter_map(|pointer| self.get(&format!("#{pointer}")).ok())
            .collect()
    }

    /// Re-roots this node as an independent document for isolated
    /// recursive evaluation: empty pointer, fresh annotation store.
    ///
    /// Side effect, deliberate and one-way: the node is detached from its
    /// structural parent, which keeps a zero-length elided placeholder at
    /// the same offset. Any already-held Instance into the old parent that
    /// re-materializes will see the empty slot instead of the subtree.
    /// Callers needing the original value afterwards must capture it
    /// before embedding. On an absent node this returns an absent embedded
    /// view and mutates nothing.
    pub fn as_embedded(&self) -> Self {
        let mut embedded = self.derive(self.node, String::new());
        embedded.annotations = Rc::new(AnnotationStore::new());
        if let Some(node) = self.node {
            self.doc.cst.borrow_mut().detach(node);
            embedded.root = Some(node);
        }
        embedded
    }

    pub fn start_position(&self) -> Option<Position> {
        let node = self.node?;
        let offset = self.doc.cst.borrow().node(node).offset;
        Some(self.doc.index.position_at(offset))
    }

    pub fn end_position(&self) -> Option<Position> {
        let node = self.node?;
        let end = self.doc.cst.borrow().node(node).end();
        Some(self.doc.index.position_at(end))
    }

    /// Raw source length of the current node in bytes.
    pub fn text_length(&self) -> Option<usize> {
        let node = self.node?;
        Some(self.doc.cst.borrow().node(node).length)
    }

    /// Maps an editor position to the Instance for the deepest node
    /// containing it, resolved against the document root. Positions
    /// outside every node yield an absent Instance with an empty pointer.
    pub fn instance_at_position(&self, position: Position) -> Self {
        let offset = self.doc.index.offset_at(position);
        let cst = self.doc.cst.borrow();
        let doc_root = cst.root();
        let found = doc_root.and_then(|root| cst.find_at_offset(root, offset));
        let (node, pointer) = match found {
            Some(node) => {
                let tokens: Vec<String> = cst
                    .path(node)
                    .into_iter()
                    .map(|step| match step {
                        PathStep::Key(key) => key,
                        PathStep::Index(index) => index.to_string(),
                    })
                    .collect();
                (Some(node), encode_pointer(&tokens))
            }
            None => (None, String::new()),
        };
        drop(cst);
        let mut resolved = self.derive(node, pointer);
        resolved.root = doc_root;
        resolved
    }
}

/// Walks decoded pointer tokens structurally. A token is an index in an
/// array and a property name in an object; anything else is a miss.
fn resolve_tokens(cst: &Cst, from: NodeId, tokens: &[String]) -> Option<NodeId> {
    let mut current = from;
    for token in tokens {
        current = match cst.node(current).kind {
            NodeKind::Object => cst.object_entry(current, token)?,
            NodeKind::Array => {
                if !is_valid_index(token) {
                    return None;
                }
                let index: usize = token.parse().ok()?;
                *cst.node(current).children.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn materialize(cst: &Cst, text: &str, id: NodeId) -> Option<Value> {
    let node = cst.node(id);
    match node.kind {
        NodeKind::Object => {
            let mut map = Map::new();
            for &property in &node.children {
                let Some(key) = cst.property_key(property) else {
                    continue;
                };
                let Some(value_id) = cst.property_value(property) else {
                    continue;
                };
                if let Some(value) = materialize(cst, text, value_id) {
                    map.insert(key.to_string(), value);
                }
            }
            Some(Value::Object(map))
        }
        NodeKind::Array => Some(Value::Array(
            node.children
                .iter()
                // Elements that cannot materialize keep their slot as null
                // so sibling indices stay stable
                .map(|&child| materialize(cst, text, child).unwrap_or(Value::Null))
                .collect(),
        )),
        NodeKind::String | NodeKind::Number | NodeKind::Bool | NodeKind::Null => {
            match &node.scalar {
                Some(value) => Some(value.clone()),
                None => serde_json::from_str(text.get(node.offset..node.end())?).ok(),
            }
        }
        NodeKind::Property | NodeKind::Elided => None,
    }
}

/// Lazy `(key, value)` pairs of an object. The key Instance addresses the
/// key string node and shares the property's pointer; it exists for
/// position queries, not for further navigation.
pub struct Entries {
    instance: Instance,
    properties: Vec<NodeId>,
    index: usize,
}

impl Iterator for Entries {
    type Item = (Instance, Instance);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let property = *self.properties.get(self.index)?;
            self.index += 1;
            let (key_node, key, value_node) = {
                let cst = self.instance.doc.cst.borrow();
                let Some(key) = cst.property_key(property) else {
                    continue;
                };
                let key_node = *cst.node(property).children.first()?;
                (key_node, key.to_string(), cst.property_value(property))
            };
            let pointer = append_token(&self.instance.pointer, &key);
            let key_instance = self.instance.derive(Some(key_node), pointer.clone());
            let value_instance = self.instance.derive(value_node, pointer);
            return Some((key_instance, value_instance));
        }
    }
}

/// Lazy element Instances of an array.
pub struct Elements {
    instance: Instance,
    children: Vec<NodeId>,
    index: usize,
}

impl Iterator for Elements {
    type Item = Instance;

    fn next(&mut self) -> Option<Self::Item> {
        let child = *self.children.get(self.index)?;
        let pointer = append_token(&self.instance.pointer, &self.index.to_string());
        self.index += 1;
        Some(self.instance.derive(Some(child), pointer))
    }
}

pub struct Keys(Entries);

impl Iterator for Keys {
    type Item = Instance;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }
}

pub struct Values(Entries);

impl Iterator for Values {
    type Item = Instance;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_instance() {
        let root = Instance::parse(r#"{"a": 1}"#);
        assert_eq!(root.pointer(), "");
        assert_eq!(root.kind(), JsonKind::Object);
        assert_eq!(root.value(), Some(json!({"a": 1})));
    }

    #[test]
    fn empty_document_is_absent() {
        let root = Instance::parse("");
        assert_eq!(root.kind(), JsonKind::Undefined);
        assert_eq!(root.value(), None);
        assert_eq!(root.step("a").value(), None);
        assert_eq!(root.length(), None);
        assert_eq!(root.entries().count(), 0);
    }

    #[test]
    fn kinds() {
        let root = Instance::parse(r#"{"s": "x", "n": 1, "b": true, "z": null, "a": [], "o": {}}"#);
        assert_eq!(root.step("s").kind(), JsonKind::String);
        assert_eq!(root.step("n").kind(), JsonKind::Number);
        assert_eq!(root.step("b").kind(), JsonKind::Boolean);
        assert_eq!(root.step("z").kind(), JsonKind::Null);
        assert_eq!(root.step("a").kind(), JsonKind::Array);
        assert_eq!(root.step("o").kind(), JsonKind::Object);
        assert_eq!(root.step("missing").kind(), JsonKind::Undefined);
    }

    #[test]
    fn step_extends_pointer_on_miss() {
        let root = Instance::parse(r#"{"a": 1}"#);
        let missing = root.step("x").step("y~z");
        assert_eq!(missing.pointer(), "/x/y~0z");
        assert_eq!(missing.value(), None);
        assert_eq!(missing.kind(), JsonKind::Undefined);
    }

    #[test]
    fn null_is_present() {
        let root = Instance::parse(r#"{"z": null}"#);
        assert_eq!(root.step("z").kind(), JsonKind::Null);
        assert_eq!(root.step("z").value(), Some(Value::Null));
        assert!(root.has("z"));
    }

    #[test]
    fn has_is_false_for_non_objects() {
        let root = Instance::parse(r#"[1, 2]"#);
        assert!(!root.has("0"));
        assert!(!root.step("anything").has("x"));
    }

    #[test]
    fn entries_in_source_order() {
        let root = Instance::parse(r#"{"b": 1, "a": 2}"#);
        let pointers: Vec<String> = root
            .entries()
            .map(|(_, value)| value.pointer().to_string())
            .collect();
        assert_eq!(pointers, vec!["/b", "/a"]);

        let keys: Vec<Value> = root.keys().filter_map(|key| key.value()).collect();
        assert_eq!(keys, vec![json!("b"), json!("a")]);

        let values: Vec<Value> = root.values().filter_map(|value| value.value()).collect();
        assert_eq!(values, vec![json!(1), json!(2)]);
    }

    #[test]
    fn entries_are_restartable() {
        let root = Instance::parse(r#"{"a": 1, "b": 2}"#);
        let first: Vec<_> = root.entries().map(|(k, _)| k.pointer().to_string()).collect();
        let second: Vec<_> = root.entries().map(|(k, _)| k.pointer().to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iter_indexes_elements() {
        let root = Instance::parse(r#"{"x": [1, 2, {"y": true}]}"#);
        let elements: Vec<Instance> = root.step("x").iter().collect();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].pointer(), "/x/0");
        assert_eq!(elements[1].pointer(), "/x/1");
        assert_eq!(elements[2].pointer(), "/x/2");
        assert_eq!(elements[2].step("y").value(), Some(json!(true)));
    }

    #[test]
    fn iter_on_non_array_is_empty() {
        let root = Instance::parse(r#"{"a": 1}"#);
        assert_eq!(root.iter().count(), 0);
        assert_eq!(root.step("a").iter().count(), 0);
        assert_eq!(root.step("missing").iter().count(), 0);
    }

    #[test]
    fn length_is_array_only() {
        let root = Instance::parse(r#"{"a": [1, 2, 3]}"#);
        assert_eq!(root.step("a").length(), Some(3));
        assert_eq!(root.length(), None);
        assert_eq!(root.step("missing").length(), None);
    }

    #[test]
    fn get_fragment() {
        let root = Instance::parse(r#"{"a": {"b": [10, 20]}}"#);
        let hit = root.get("#/a/b/1").unwrap();
        assert_eq!(hit.value(), Some(json!(20)));
        assert_eq!(hit.pointer(), "/a/b/1");

        let miss = root.get("#/a/zzz").unwrap();
        assert_eq!(miss.kind(), JsonKind::Undefined);
        assert_eq!(miss.pointer(), "/a/zzz");

        let whole = root.get("#").unwrap();
        assert_eq!(whole.pointer(), "");
        assert_eq!(whole.kind(), JsonKind::Object);
    }

    #[test]
    fn get_rejects_non_fragment() {
        let root = Instance::parse("{}");
        let err = root.get("https://example.com/schema#/a").unwrap_err();
        assert!(matches!(err, InstanceError::Resolution { .. }));
    }

    #[test]
    fn get_rejects_malformed_pointer() {
        let root = Instance::parse("{}");
        let err = root.get("#a/b").unwrap_err();
        assert!(matches!(err, InstanceError::Pointer(_)));
    }

    #[test]
    fn get_numeric_key_on_object() {
        // A numeric token is a property name when the container is an object
        let root = Instance::parse(r#"{"0": "zero"}"#);
        assert_eq!(root.get("#/0").unwrap().value(), Some(json!("zero")));
    }

    #[test]
    fn get_rejects_sloppy_index() {
        let root = Instance::parse("[1, 2, 3]");
        assert_eq!(root.get("#/01").unwrap().kind(), JsonKind::Undefined);
        assert_eq!(root.get("#/1").unwrap().value(), Some(json!(2)));
    }

    #[test]
    fn parent_keeps_pointer() {
        let root = Instance::parse(r#"{"a": {"b": 1}}"#);
        let b = root.step("a").step("b");
        let parent = b.parent();
        // Structural parent of a member value is the property node
        assert_eq!(parent.pointer(), "/a/b");
        assert_eq!(parent.kind(), JsonKind::Undefined);
        // Grandparent is the enclosing object
        assert_eq!(parent.parent().kind(), JsonKind::Object);
    }

    #[test]
    fn escaped_keys_roundtrip_through_step_and_get() {
        let root = Instance::parse(r#"{"a/b": {"c~d": 1}}"#);
        let stepped = root.step("a/b").step("c~d");
        assert_eq!(stepped.pointer(), "/a~1b/c~0d");
        assert_eq!(stepped.value(), Some(json!(1)));
        assert_eq!(
            root.get("#/a~1b/c~0d").unwrap().value(),
            Some(json!(1))
        );
    }

    #[test]
    fn value_through_comments() {
        let root = Instance::parse("// doc\n{\"a\": /* inline */ [1, 2,],}");
        assert_eq!(root.value(), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn partial_property_is_absent_but_present() {
        let root = Instance::parse(r#"{"a": }"#);
        assert!(root.has("a"));
        let a = root.step("a");
        assert_eq!(a.kind(), JsonKind::Undefined);
        assert_eq!(a.value(), None);
        // The property is skipped when the object materializes
        assert_eq!(root.value(), Some(json!({})));
        assert!(!root.parse_errors().is_empty());
    }
}
