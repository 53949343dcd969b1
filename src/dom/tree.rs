//! Tree operations: insert, remove, walk, attribute mutation.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Errors from DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    NoSuchNode(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

/// An HTML document tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// A `NodeId` stays valid (and unique) for as long as its node is in the tree,
/// which is what lets callers key side tables on it.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, DomError> {
        if !self.nodes.contains_key(parent) {
            return Err(DomError::NoSuchNode(parent));
        }
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        Ok(id)
    }

    /// Insert a node immediately before `sibling`, under the same parent.
    pub fn insert_before(&mut self, sibling: NodeId, data: NodeData) -> Result<NodeId, DomError> {
        let parent = self.parent(sibling).ok_or(DomError::NoSuchNode(sibling))?;
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            let index = siblings
                .iter()
                .position(|&child| child == sibling)
                .unwrap_or(siblings.len());
            siblings.insert(index, id);
        }
        Ok(id)
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        // Collect all descendants (BFS) to remove them.
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// The element data of a node, if it exists and is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(NodeData::as_element)
    }

    /// Set an attribute on an element node.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let node = self.nodes.get_mut(id).ok_or(DomError::NoSuchNode(id))?;
        let element = node.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        element.set_attr(name, value);
        Ok(())
    }

    /// Concatenated text of the node's direct text children.
    ///
    /// This is what a `<style>` element holds; the HTML parser never nests
    /// elements inside raw-text elements.
    pub fn text_content(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&child| match self.get(child) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`: document order.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
