//! Instance-layer errors.
//!
//! Only caller bugs surface as errors: resolving a reference this layer
//! cannot handle, or handing it a malformed pointer. Structural misses
//! (unknown property, index out of bounds, position outside any node) are
//! soft and come back as absent Instances instead.

use json_lens_json_pointer::PointerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// Only same-document fragment references (`#<pointer>`) can be
    /// resolved here; anything with a scheme or authority belongs to the
    /// caller's reference resolver.
    #[error("cannot resolve non-fragment reference {reference:?}")]
    Resolution { reference: String },

    #[error(transparent)]
    Pointer(#[from] PointerError),
}
