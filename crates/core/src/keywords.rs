//! Dialect-aware keyword identifier registry.
//!
//! A schema dialect maps short keyword names to canonical keyword
//! identifiers, and the same short name can map to different identifiers
//! under different dialects. Annotations are stored under the canonical
//! identifier so that lookups agree across aliasing.

use indexmap::IndexMap;

pub const DIALECT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";
pub const DIALECT_2019_09: &str = "https://json-schema.org/draft/2019-09/schema";

const KEYWORD_BASE: &str = "https://json-schema.org/keyword/";

/// Annotation-producing keywords shared by both supported dialects.
const COMMON_KEYWORDS: &[&str] = &[
    "title",
    "description",
    "default",
    "deprecated",
    "readOnly",
    "writeOnly",
    "examples",
    "format",
    "contentMediaType",
    "contentEncoding",
    "contentSchema",
    "properties",
    "patternProperties",
    "additionalProperties",
    "contains",
    "unevaluatedItems",
    "unevaluatedProperties",
];

#[derive(Debug, Clone, Default)]
pub struct Keywords {
    dialects: IndexMap<String, IndexMap<String, String>>,
}

impl Keywords {
    /// An empty registry; every short name resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the 2019-09 and 2020-12 annotation
    /// keywords. The array keywords differ between the two: 2020-12 splits
    /// tuple validation into `prefixItems`, while 2019-09 keeps the
    /// array-form `items` plus `additionalItems`.
    pub fn standard() -> Self {
        let mut keywords = Self::new();
        for dialect in [DIALECT_2020_12, DIALECT_2019_09] {
            for name in COMMON_KEYWORDS {
                keywords.register(dialect, *name, format!("{KEYWORD_BASE}{name}"));
            }
        }
        keywords.register(DIALECT_2020_12, "items", format!("{KEYWORD_BASE}items"));
        keywords.register(
            DIALECT_2020_12,
            "prefixItems",
            format!("{KEYWORD_BASE}prefixItems"),
        );
        keywords.register(
            DIALECT_2019_09,
            "items",
            format!("{KEYWORD_BASE}draft-2019-09/items"),
        );
        keywords.register(
            DIALECT_2019_09,
            "additionalItems",
            format!("{KEYWORD_BASE}draft-2019-09/additionalItems"),
        );
        keywords
    }

    pub fn register(
        &mut self,
        dialect: impl Into<String>,
        name: impl Into<String>,
        id: impl Into<String>,
    ) {
        self.dialects
            .entry(dialect.into())
            .or_default()
            .insert(name.into(), id.into());
    }

    /// Resolves a short keyword name to its canonical identifier under a
    /// dialect. Names that are already absolute (contain a scheme) pass
    /// through untouched; unregistered names fall back to themselves, so
    /// lookups degrade to exact-string matching.
    pub fn resolve(&self, keyword: &str, dialect: &str) -> String {
        if keyword.contains(':') {
            return keyword.to_string();
        }
        self.dialects
            .get(dialect)
            .and_then(|table| table.get(keyword))
            .cloned()
            .unwrap_or_else(|| keyword.to_string())
    }
}
