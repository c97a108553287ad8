//! Copy-on-write annotation store.
//!
//! Records keyword evaluation outputs keyed by pointer, then by canonical
//! keyword identifier, each holding an ordered list of values with the most
//! recent first. A store is never mutated in place: updates produce a new
//! store that shares every untouched pointer entry with its parent, so
//! Instances derived from one another stay cheap while their annotation
//! views stay isolated.

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

type KeywordMap = IndexMap<String, Vec<Value>>;

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    by_pointer: IndexMap<String, Rc<KeywordMap>>,
}

const EMPTY: &[Value] = &[];

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new store with `value` prepended to the list recorded
    /// under `(pointer, keyword_id)`. Only the touched pointer entry is
    /// copied; all other entries are shared with `self` by reference.
    pub fn with_prepended(&self, pointer: &str, keyword_id: &str, value: Value) -> Self {
        let mut by_pointer = self.by_pointer.clone();
        let mut keyword_map = match by_pointer.get(pointer) {
            Some(existing) => (**existing).clone(),
            None => KeywordMap::new(),
        };
        let previous = keyword_map.get(keyword_id).map(Vec::as_slice).unwrap_or(EMPTY);
        let mut list = Vec::with_capacity(previous.len() + 1);
        list.push(value);
        list.extend_from_slice(previous);
        keyword_map.insert(keyword_id.to_string(), list);
        by_pointer.insert(pointer.to_string(), Rc::new(keyword_map));
        Self { by_pointer }
    }

    /// The recorded values for `(pointer, keyword_id)`, most recent first.
    pub fn get(&self, pointer: &str, keyword_id: &str) -> &[Value] {
        self.by_pointer
            .get(pointer)
            .and_then(|keyword_map| keyword_map.get(keyword_id))
            .map(Vec::as_slice)
            .unwrap_or(EMPTY)
    }

    /// Pointers carrying at least one value under `keyword_id`, in the
    /// order they were first annotated.
    pub fn pointers_with<'a>(&'a self, keyword_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.by_pointer
            .iter()
            .filter(move |(_, keyword_map)| {
                keyword_map.get(keyword_id).is_some_and(|list| !list.is_empty())
            })
            .map(|(pointer, _)| pointer.as_str())
    }
}
