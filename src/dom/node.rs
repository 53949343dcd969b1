//! Node types: NodeId, NodeData, ElementData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root.
    Document,
    /// `<!DOCTYPE name>`.
    Doctype { name: String },
    /// An element with its tag name and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment (`<!-- ... -->`).
    Comment(String),
}

impl NodeData {
    /// Shorthand for an element node with no attributes.
    pub fn element(name: impl Into<String>) -> Self {
        NodeData::Element(ElementData::new(name))
    }

    /// Shorthand for a text node.
    pub fn text(text: impl Into<String>) -> Self {
        NodeData::Text(text.into())
    }

    /// The element data, if this node is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable element data, if this node is an element.
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element(_))
    }

    /// Whether this node is an element with the given (lowercase) tag name.
    pub fn is_element_named(&self, name: &str) -> bool {
        self.as_element().is_some_and(|element| element.name == name)
    }
}

/// An element's tag name and attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name, lowercase for HTML elements.
    pub name: String,
    /// Attributes as `(name, value)` pairs, in source order.
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    #[cfg(test)]
    pub(crate) fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            let classes = match self.attr("class") {
                Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
                _ => class.to_owned(),
            };
            self.set_attr("class", classes);
        }
        self
    }

    /// The value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Check whether this element has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}
