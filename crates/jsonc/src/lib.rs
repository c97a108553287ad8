//! Concrete syntax tree for JSON with comments.
//!
//! Parses JSONC source into an arena of spanned nodes without losing source
//! fidelity: every node records its exact byte offset and length, comments
//! and trailing commas are tolerated, and malformed input degrades to a
//! partial tree plus diagnostics instead of a failure.
//!
//! # Example
//!
//! ```
//! use json_lens_jsonc::{parse, NodeKind, PathStep};
//!
//! let cst = parse("// config\n{\"retries\": 3}");
//! let root = cst.root().unwrap();
//! assert_eq!(cst.node(root).kind, NodeKind::Object);
//!
//! let retries = cst
//!     .find_at_location(root, &[PathStep::Key("retries".into())])
//!     .unwrap();
//! assert_eq!(cst.node(retries).scalar, Some(3.into()));
//! ```

pub mod cst;
pub mod error;
pub mod parser;
pub mod text;
pub mod tokenizer;

pub use cst::{Cst, Node, NodeId, NodeKind, PathStep};
pub use error::{ParseError, ParseErrorKind, ScanErrorKind};
pub use parser::parse;
pub use text::{Position, TextIndex};
