//! Single-pass decoding of an element's child list.
//!
//! OAI-PMH never mixes meaningful text with sibling elements, so one level of
//! the document decodes to either a text value or a set of element children
//! grouped by tag name. Payload subtrees (`metadata`, `about`, descriptions)
//! are not decoded at all; they are sliced verbatim out of the input buffer.

use roxmltree::{Node, NodeType};

use super::path::NodePath;
use crate::error::ValidationFault;

/// Element children of one node, grouped by local tag name.
///
/// Groups keep the order in which a name first appears, and occurrences within
/// a group keep document order, so repeated elements (`error`, `record`, `set`)
/// come back exactly as the repository sent them.
#[derive(Debug, Default)]
pub(crate) struct ElementGroups<'a, 'input> {
    groups: Vec<(&'a str, Vec<Node<'a, 'input>>)>,
}

impl<'a, 'input> ElementGroups<'a, 'input> {
    fn insert(&mut self, node: Node<'a, 'input>) {
        let name = node.tag_name().name();
        match self.groups.iter_mut().find(|(group, _)| *group == name) {
            Some((_, nodes)) => nodes.push(node),
            None => self.groups.push((name, vec![node])),
        }
    }

    /// All occurrences of `name`, in document order. Empty slice when absent.
    pub(crate) fn get(&self, name: &str) -> &[Node<'a, 'input>] {
        self.groups
            .iter()
            .find(|(group, _)| *group == name)
            .map(|(_, nodes)| nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Tag names present at this level, in first-appearance order.
    pub(crate) fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|(name, _)| *name)
    }
}

/// What one element's child list decodes to.
#[derive(Debug)]
pub(crate) enum NodeContent<'a, 'input> {
    /// Concatenated non-whitespace text and CDATA content. An element without
    /// children decodes to the empty string.
    Text(String),
    /// Element children grouped by tag name.
    Elements(ElementGroups<'a, 'input>),
}

/// Decode a child list into text or grouped elements.
///
/// Whitespace-only text, comments and processing instructions are skipped.
/// Non-whitespace text mixed with elements at the same level fails validation.
pub(crate) fn decode_children<'a, 'input>(
    path: &NodePath,
    children: impl Iterator<Item = Node<'a, 'input>>,
) -> Result<NodeContent<'a, 'input>, ValidationFault> {
    let mut text: Option<String> = None;
    let mut elements: Option<ElementGroups<'a, 'input>> = None;

    for child in children {
        match child.node_type() {
            NodeType::Element => {
                if text.is_some() {
                    return Err(path.fault("text content mixed with child elements"));
                }
                elements.get_or_insert_with(ElementGroups::default).insert(child);
            }
            NodeType::Text => {
                let value = child.text().unwrap_or("");
                if value.chars().all(char::is_whitespace) {
                    continue;
                }
                if elements.is_some() {
                    return Err(path.fault("text content mixed with child elements"));
                }
                match &mut text {
                    Some(accumulated) => accumulated.push_str(value),
                    None => text = Some(value.to_string()),
                }
            }
            NodeType::Comment | NodeType::PI => {}
            // The root node is the parse entry point; it can never appear as a
            // child of anything.
            NodeType::Root => unreachable!("root node as a child"),
        }
    }

    Ok(match (text, elements) {
        (Some(value), _) => NodeContent::Text(value),
        (None, Some(groups)) => NodeContent::Elements(groups),
        (None, None) => NodeContent::Text(String::new()),
    })
}

/// Verbatim inner XML of `node`: everything between its start and end tags,
/// exactly as it appeared in the input. Empty string for an empty element.
pub(crate) fn inner_xml(node: Node<'_, '_>) -> String {
    match (node.first_child(), node.last_child()) {
        (Some(first), Some(last)) => {
            node.document().input_text()[first.range().start..last.range().end].to_string()
        }
        _ => String::new(),
    }
}
