//! XML decoding utilities for OAI-PMH responses.
//!
//! Responses are parsed with `roxmltree` and then decoded level by level:
//! `tree` turns one element's children into either text or grouped child
//! elements, and `scope` layers path-tracked navigation on top so every
//! validation failure reports the dotted location it occurred at.

mod path;
mod scope;
mod tree;

pub use path::NodePath;

pub(crate) use scope::{ElementRef, ElementScope};
