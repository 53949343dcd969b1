//! HTML serialization of the arena DOM through html5ever's serializer.
//!
//! [`SerializableNode`] feeds a subtree to any html5ever [`Serializer`], so
//! void elements, raw-text elements and entity escaping follow html5ever's
//! fragment serialization rules.

use std::io;

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{namespace_url, ns, LocalName, QualName};
use log::warn;

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// A node of a [`Dom`] that html5ever can serialize.
#[derive(Debug, Clone, Copy)]
pub struct SerializableNode<'a> {
    dom: &'a Dom,
    id: NodeId,
}

enum SerializeOp {
    Open(NodeId),
    Close(QualName),
}

fn element_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

/// Attribute names are stored with any prefix folded in (`xlink:href`).
fn attribute_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let dom = self.dom;
        let children = move |id: NodeId| {
            dom.children(id)
                .iter()
                .rev()
                .map(|&child| SerializeOp::Open(child))
        };
        let mut ops: Vec<SerializeOp> = match traversal_scope {
            TraversalScope::IncludeNode => vec![SerializeOp::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => children(self.id).collect(),
        };

        while let Some(op) = ops.pop() {
            let id = match op {
                SerializeOp::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
                SerializeOp::Open(id) => id,
            };
            match dom.get(id) {
                None => {}
                Some(NodeData::Document) => ops.extend(children(id)),
                Some(NodeData::Doctype { name }) => serializer.write_doctype(name)?,
                Some(NodeData::Comment(text)) => serializer.write_comment(text)?,
                Some(NodeData::Text(text)) => serializer.write_text(text)?,
                Some(NodeData::Element(element)) => {
                    let name = element_name(&element.name);
                    let attrs: Vec<(QualName, &str)> = element
                        .attrs
                        .iter()
                        .map(|(name, value)| (attribute_name(name), value.as_str()))
                        .collect();
                    serializer
                        .start_elem(name.clone(), attrs.iter().map(|(name, value)| (name, *value)))?;
                    ops.push(SerializeOp::Close(name));
                    ops.extend(children(id));
                }
            }
        }
        Ok(())
    }
}

impl Dom {
    /// A handle html5ever can serialize, rooted at `id`.
    pub fn serializable(&self, id: NodeId) -> SerializableNode<'_> {
        SerializableNode { dom: self, id }
    }

    /// Write one node and its subtree as HTML.
    pub fn write_html<W: io::Write>(&self, writer: W, id: NodeId) -> io::Result<()> {
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..SerializeOpts::default()
        };
        serialize(writer, &self.serializable(id), opts)
    }

    /// Serialize the whole document to HTML text.
    pub fn to_html(&self) -> String {
        self.root()
            .map(|root| self.node_to_html(root))
            .unwrap_or_default()
    }

    /// Serialize one node and its subtree.
    pub fn node_to_html(&self, id: NodeId) -> String {
        let mut out = Vec::new();
        if let Err(err) = self.write_html(&mut out, id) {
            warn!("failed to serialize node {id:?}: {err}");
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}
