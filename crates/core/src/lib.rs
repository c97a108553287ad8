//! Addressable, annotatable instance view over JSONC documents.
//!
//! Unifies a source-exact CST with RFC 6901 addressing and an annotation
//! side channel, so a schema evaluator and an editor integration can
//! navigate the same document by pointer, by structural step, or by text
//! position without losing comments, trailing commas, or exact offsets.
//!
//! # Example
//!
//! ```
//! use json_lens_core::{Instance, JsonKind};
//! use serde_json::json;
//!
//! let root = Instance::parse(r#"{"x": [1, 2, {"y": true}]}"#);
//!
//! // Structural navigation
//! let third = root.step("x").iter().nth(2).unwrap();
//! assert_eq!(third.pointer(), "/x/2");
//! assert_eq!(third.step("y").value(), Some(json!(true)));
//!
//! // Pointer addressing
//! let same = root.get("#/x/2/y").unwrap();
//! assert_eq!(same.value(), Some(json!(true)));
//!
//! // Misses are absent Instances, not errors
//! assert_eq!(root.step("nope").kind(), JsonKind::Undefined);
//! ```

pub mod annotations;
pub mod error;
pub mod instance;
pub mod keywords;

pub use annotations::AnnotationStore;
pub use error::InstanceError;
pub use instance::{Elements, Entries, Instance, JsonKind, Keys, Values};
pub use keywords::{Keywords, DIALECT_2019_09, DIALECT_2020_12};

// Position types come from the CST crate but are part of this API surface
pub use json_lens_jsonc::{ParseError, ParseErrorKind, Position};
