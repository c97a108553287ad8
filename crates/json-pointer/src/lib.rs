//! JSON Pointer (RFC 6901) codec.
//!
//! This crate implements the pointer syntax of [RFC 6901](https://tools.ietf.org/html/rfc6901):
//! escaping and unescaping of reference tokens, encoding a token path into a
//! canonical pointer string, and strict decoding back into tokens.
//!
//! # Example
//!
//! ```
//! use json_lens_json_pointer::{decode_pointer, encode_pointer, append_token};
//!
//! let tokens = decode_pointer("/foo/bar").unwrap();
//! assert_eq!(tokens, vec!["foo".to_string(), "bar".to_string()]);
//!
//! let pointer = encode_pointer(&tokens);
//! assert_eq!(pointer, "/foo/bar");
//!
//! assert_eq!(append_token(&pointer, "a/b"), "/foo/bar/a~1b");
//! ```

use thiserror::Error;

/// Unescapes a single reference token.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` with `~`.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::unescape_token;
///
/// assert_eq!(unescape_token("a~0b"), "a~b");
/// assert_eq!(unescape_token("c~1d"), "c/d");
/// assert_eq!(unescape_token("plain"), "plain");
/// ```
pub fn unescape_token(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    token.replace("~1", "/").replace("~0", "~")
}

/// Escapes a single reference token.
///
/// Per RFC 6901, `~` is replaced with `~0` and `/` with `~1`.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::escape_token;
///
/// assert_eq!(escape_token("a~b"), "a~0b");
/// assert_eq!(escape_token("c/d"), "c~1d");
/// assert_eq!(escape_token("plain"), "plain");
/// ```
pub fn escape_token(token: &str) -> String {
    if !token.contains('/') && !token.contains('~') {
        return token.to_string();
    }
    // Order matters: ~ must be escaped before /, so that the ~ introduced
    // for / is not escaped again
    token.replace('~', "~0").replace('/', "~1")
}

/// Encodes a token path into a canonical pointer string.
///
/// The empty path encodes to the empty pointer `""`, which addresses the
/// document root.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::encode_pointer;
///
/// assert_eq!(encode_pointer::<&str>(&[]), "");
/// assert_eq!(encode_pointer(&["foo", "bar"]), "/foo/bar");
/// assert_eq!(encode_pointer(&["a~b", "c/d"]), "/a~0b/c~1d");
/// ```
pub fn encode_pointer<S: AsRef<str>>(tokens: &[S]) -> String {
    if tokens.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_token(token.as_ref()));
    }
    out
}

/// Decodes a pointer string into its reference tokens.
///
/// The empty pointer decodes to zero tokens. A non-empty pointer that does
/// not start with `/` is a format violation and is rejected.
///
/// Scanning for literal `/` delimiters before unescaping is correct because
/// a `/` inside a token is always encoded as `~1` and so never appears
/// literally.
///
/// # Errors
///
/// Returns [`PointerError::Malformed`] for a non-empty pointer without a
/// leading `/`.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::decode_pointer;
///
/// assert_eq!(decode_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(decode_pointer("/").unwrap(), vec![""]);
/// assert_eq!(decode_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(decode_pointer("foo/bar").is_err());
/// ```
pub fn decode_pointer(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PointerError::Malformed {
            pointer: pointer.to_string(),
        });
    }
    Ok(pointer[1..].split('/').map(unescape_token).collect())
}

/// Appends one raw token to an existing pointer string.
///
/// The token is escaped; the base pointer is assumed to already be in
/// canonical form.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::append_token;
///
/// assert_eq!(append_token("", "foo"), "/foo");
/// assert_eq!(append_token("/foo", "0"), "/foo/0");
/// assert_eq!(append_token("/foo", "~x/y"), "/foo/~0x~1y");
/// ```
pub fn append_token(pointer: &str, token: &str) -> String {
    let escaped = escape_token(token);
    let mut out = String::with_capacity(pointer.len() + escaped.len() + 1);
    out.push_str(pointer);
    out.push('/');
    out.push_str(&escaped);
    out
}

/// Checks whether a token is a valid array index: ASCII digits only, with
/// no superfluous leading zero.
///
/// # Example
///
/// ```
/// use json_lens_json_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let bytes = token.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("malformed JSON Pointer: {pointer:?}")]
    Malformed { pointer: String },
}
