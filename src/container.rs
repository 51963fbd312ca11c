//! Container tree for the threading algorithm.
//!
//! The jwz algorithm is usually described over first-child / next-sibling
//! pointer structures. This implementation stores containers in an arena
//! (`Vec<Container<T>>`) addressed by [`NodeId`] handles, with each parent
//! keeping an ordered `Vec<NodeId>` of children. The ordered vector plays
//! the role of the sibling chain, parent links are plain back-indices, and
//! tree mutation cannot produce the circular sibling lists that pointer
//! representations have to defend against.
//!
//! ## Phantom Containers
//!
//! Containers without a message represent ids that were only ever seen
//! inside a References header, the virtual root, and the synthetic parents
//! created while grouping roots by subject. They keep the structure of a
//! conversation intact even when some of its messages are missing.

use crate::message::Message;

/// Handle to a container slot inside a [`ThreadTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A node in the thread tree: zero or one message plus its links.
#[derive(Debug, Clone)]
pub struct Container<T> {
    message: Option<Message<T>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> Container<T> {
    fn phantom() -> Self {
        Container {
            message: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn with_message(message: Message<T>) -> Self {
        Container {
            message: Some(message),
            parent: None,
            children: Vec::new(),
        }
    }

    /// The message held by this container, if any.
    pub fn message(&self) -> Option<&Message<T>> {
        self.message.as_ref()
    }

    /// Parent container; `None` for the virtual root and for containers
    /// detached during pruning.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child containers in sibling order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this container holds no message.
    pub fn is_phantom(&self) -> bool {
        self.message.is_none()
    }
}

/// The built conversation forest.
///
/// Owns every container produced by a threading run. The virtual root is
/// the parent of all conversation roots; it holds no message and never
/// appears as anybody's child. Containers detached while the tree was
/// built stay in the arena but are not reachable from the root.
#[derive(Debug, Clone)]
pub struct ThreadTree<T> {
    nodes: Vec<Container<T>>,
    root: NodeId,
}

impl<T> ThreadTree<T> {
    pub(crate) fn new() -> Self {
        ThreadTree {
            nodes: vec![Container::phantom()],
            root: NodeId(0),
        }
    }

    /// The virtual root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a container.
    pub fn container(&self, id: NodeId) -> &Container<T> {
        &self.nodes[id.0]
    }

    /// Message held by `id`, if any.
    pub fn message(&self, id: NodeId) -> Option<&Message<T>> {
        self.nodes[id.0].message()
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Depth-first traversal over the forest, virtual root first.
    ///
    /// Children are visited in sibling order; the traversal keeps an
    /// explicit stack and handles arbitrarily deep trees.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Number of containers reachable under the virtual root, excluding
    /// the root itself. With `count_empty` set, phantom containers are
    /// included in the sum.
    pub fn count(&self, count_empty: bool) -> usize {
        self.iter()
            .filter(|&id| id != self.root)
            .filter(|&id| count_empty || self.nodes[id.0].message.is_some())
            .count()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn new_phantom(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Container::phantom());
        id
    }

    pub(crate) fn new_message_node(&mut self, message: Message<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Container::with_message(message));
        id
    }

    pub(crate) fn set_message(&mut self, id: NodeId, message: Message<T>) {
        debug_assert!(self.nodes[id.0].message.is_none());
        self.nodes[id.0].message = Some(message);
    }

    /// Append `child` to `parent`'s children, detaching it from its
    /// previous parent first.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(parent != child);
        self.detach(child);
        debug_assert!(!self.nodes[parent.0].children.contains(&child));
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Unlink `child` from its parent's children list, preserving the
    /// order of the remaining siblings.
    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.detach(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != child);
            self.nodes[child.0].parent = None;
        }
    }

    /// Detach and return all children of `node`, in order.
    pub(crate) fn take_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    /// Replace `old` in its parent's children list with `replacement`,
    /// keeping the position. `old` ends up detached; the replacement
    /// containers are re-parented onto `old`'s former parent.
    pub(crate) fn splice_child(&mut self, old: NodeId, replacement: Vec<NodeId>) {
        let Some(parent) = self.nodes[old.0].parent else {
            return;
        };
        let Some(position) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old)
        else {
            return;
        };
        self.nodes[parent.0]
            .children
            .splice(position..position + 1, replacement.iter().copied());
        self.nodes[old.0].parent = None;
        for &id in &replacement {
            self.nodes[id.0].parent = Some(parent);
        }
    }

    /// Whether `a` is `b` itself or a descendant of `b`.
    pub(crate) fn reachable(&self, a: NodeId, b: NodeId) -> bool {
        let mut stack = vec![b];
        while let Some(current) = stack.pop() {
            if current == a {
                return true;
            }
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
        false
    }
}

/// Iterative depth-first traversal over a [`ThreadTree`].
pub struct Iter<'a, T> {
    tree: &'a ThreadTree<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = &self.tree.nodes[id.0].children;
        self.stack.extend(children.iter().rev().copied());
        Some(id)
    }
}
