//! Dotted paths into a response document, used in validation messages.

use crate::error::ValidationFault;

/// Immutable dotted path to an element in a decoded document.
///
/// The document root is the empty path; every descent appends `.segment`, so a
/// record header inside a `GetRecord` body reads
/// `.OAI-PMH.GetRecord.record.header`. Items of repeated elements append their
/// zero-based position (`.OAI-PMH.ListSets.set.1`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath(String);

impl NodePath {
    /// Path of the document root.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path one level down, at the child element `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{segment}", self.0))
    }

    /// Path of the `index`-th occurrence of a repeated element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}.{index}", self.0))
    }

    /// The dotted form, e.g. `.OAI-PMH.Identify.deletedRecord`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a validation fault located at this path.
    pub(crate) fn fault(&self, message: impl Into<String>) -> ValidationFault {
        ValidationFault::new(self.clone(), message)
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
