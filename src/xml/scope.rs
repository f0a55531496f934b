//! Path-tracked navigation over decoded element children.
//!
//! An [`ElementScope`] is one decoded level of the response together with the
//! dotted path that leads to it, so every multiplicity or content check can
//! report exactly where in the document it failed. Repeated elements that
//! carry structure (`record`, `set`, `metadataFormat`) get a numeric path
//! segment per occurrence; repeated text elements (`setSpec`, `about`) share
//! the unindexed path.

use roxmltree::{Document, Node};

use super::path::NodePath;
use super::tree::{decode_children, inner_xml, NodeContent};
use crate::error::ValidationFault;

/// One decoded level of the document: grouped element children plus the path
/// that was navigated to reach them.
#[derive(Debug)]
pub(crate) struct ElementScope<'a, 'input> {
    path: NodePath,
    groups: super::tree::ElementGroups<'a, 'input>,
}

impl<'a, 'input> ElementScope<'a, 'input> {
    /// Decode the document level of `doc`. The resulting scope holds the root
    /// element under its tag name, so navigation starts the same way at every
    /// level.
    pub(crate) fn decode_root(doc: &'a Document<'input>) -> Result<Self, ValidationFault> {
        let path = NodePath::root();
        match decode_children(&path, doc.root().children())? {
            NodeContent::Elements(groups) => Ok(Self { path, groups }),
            NodeContent::Text(_) => Err(path.fault("expected element children")),
        }
    }

    pub(crate) fn path(&self) -> &NodePath {
        &self.path
    }

    /// Tag names present at this level, in first-appearance order.
    pub(crate) fn field_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.names()
    }

    /// The element `name`, which must occur exactly once at this level.
    pub(crate) fn required(&self, name: &str) -> Result<ElementRef<'a, 'input>, ValidationFault> {
        let path = self.path.child(name);
        match self.groups.get(name) {
            [] => Err(path.fault("expected exactly one occurrence, found none")),
            [node] => Ok(ElementRef { path, node: *node }),
            nodes => Err(path.fault(format!(
                "expected exactly one occurrence, found {}",
                nodes.len()
            ))),
        }
    }

    /// The element `name` if present, which must occur at most once.
    pub(crate) fn optional(
        &self,
        name: &str,
    ) -> Result<Option<ElementRef<'a, 'input>>, ValidationFault> {
        let path = self.path.child(name);
        match self.groups.get(name) {
            [] => Ok(None),
            [node] => Ok(Some(ElementRef { path, node: *node })),
            nodes => Err(path.fault(format!(
                "expected at most one occurrence, found {}",
                nodes.len()
            ))),
        }
    }

    /// Every occurrence of `name`, all sharing the unindexed child path.
    pub(crate) fn entries(&self, name: &str) -> Vec<ElementRef<'a, 'input>> {
        let path = self.path.child(name);
        self.groups
            .get(name)
            .iter()
            .map(|node| ElementRef {
                path: path.clone(),
                node: *node,
            })
            .collect()
    }

    /// Every occurrence of `name`, each with a numeric path segment so faults
    /// inside one occurrence name which one.
    pub(crate) fn indexed(&self, name: &str) -> Vec<ElementRef<'a, 'input>> {
        let path = self.path.child(name);
        self.groups
            .get(name)
            .iter()
            .enumerate()
            .map(|(index, node)| ElementRef {
                path: path.index(index),
                node: *node,
            })
            .collect()
    }

    /// Text content of the element `name`, which must occur exactly once.
    pub(crate) fn required_text(&self, name: &str) -> Result<String, ValidationFault> {
        self.required(name)?.text()
    }

    /// Text content of the element `name` if present.
    pub(crate) fn optional_text(&self, name: &str) -> Result<Option<String>, ValidationFault> {
        match self.optional(name)? {
            Some(element) => Ok(Some(element.text()?)),
            None => Ok(None),
        }
    }

    /// Text content of every occurrence of `name`.
    pub(crate) fn texts(&self, name: &str) -> Result<Vec<String>, ValidationFault> {
        self.entries(name)
            .iter()
            .map(ElementRef::text)
            .collect()
    }
}

/// A single element occurrence together with its path.
#[derive(Debug, Clone)]
pub(crate) struct ElementRef<'a, 'input> {
    path: NodePath,
    node: Node<'a, 'input>,
}

impl<'a, 'input> ElementRef<'a, 'input> {
    pub(crate) fn path(&self) -> &NodePath {
        &self.path
    }

    /// The element's decoded text content. Fails when the element has child
    /// elements instead.
    pub(crate) fn text(&self) -> Result<String, ValidationFault> {
        match decode_children(&self.path, self.node.children())? {
            NodeContent::Text(value) => Ok(value),
            NodeContent::Elements(_) => Err(self.path.fault("expected text content")),
        }
    }

    /// Descend into the element's children. Fails when the element holds text
    /// content (or nothing) instead of child elements.
    pub(crate) fn nested(&self) -> Result<ElementScope<'a, 'input>, ValidationFault> {
        match decode_children(&self.path, self.node.children())? {
            NodeContent::Elements(groups) => Ok(ElementScope {
                path: self.path.clone(),
                groups,
            }),
            NodeContent::Text(_) => Err(self.path.fault("expected element children")),
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// The attribute `name`, which must be present on this element.
    pub(crate) fn required_attr(&self, name: &str) -> Result<&'a str, ValidationFault> {
        self.attr(name)
            .ok_or_else(|| self.path.fault(format!("expected a `{name}` attribute")))
    }

    /// The element's inner XML, verbatim from the input.
    pub(crate) fn inner_xml(&self) -> String {
        inner_xml(self.node)
    }
}
