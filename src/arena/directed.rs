//! Implementation of a directionally iterable
//! [arena allocated](https://en.wikipedia.org/wiki/Region-based_memory_management)
//! tree. Iteration follows child references and is therefore slower than iterating the
//! [DepthFirstArenaTree] it converts into.

use super::iterables::{BaseDirectionIterable, DepthFirstIterable, DirectionIterable, Nodelike};
use super::DepthFirstArenaTree;
use crate::MarionetteError;
use core::fmt;
use std::{collections::HashMap, fmt::Debug, hash::Hash};

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
pub struct ArenaIndex(pub usize);

/// A node structure to be used in an arena allocated tree. Fields are used to speed up iteration
#[derive(Debug)]
pub struct ArenaNode<Load, NodeId> {
    /// The user-defined load that the node owns
    pub(super) load: Load,
    /// Index in the arena allocation
    pub(super) index: ArenaIndex,
    /// identifier for lookups
    pub(super) id: NodeId,
    /// references for children
    pub(super) children: Vec<ArenaIndex>,
    /// Size of the subtree rooted at this node (including itself)
    pub(super) width: usize,
    /// Depth in the tree
    pub(super) depth: usize,
    pub(super) parent_ref: Option<ArenaIndex>,
}

impl<Load, NodeId> ArenaNode<Load, NodeId> {
    pub fn index(&self) -> ArenaIndex {
        self.index
    }

    pub fn parent_index(&self) -> Option<ArenaIndex> {
        self.parent_ref
    }

    pub fn child_indices(&self) -> &[ArenaIndex] {
        &self.children
    }

    /// Number of nodes in the subtree rooted at this node
    pub fn width(&self) -> usize {
        self.width
    }
}

impl<Load, NodeId> Nodelike<Load, NodeId> for ArenaNode<Load, NodeId>
where
    NodeId: Clone,
{
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn get(&self) -> &Load {
        &self.load
    }

    fn get_mut(&mut self) -> &mut Load {
        &mut self.load
    }

    fn id(&self) -> NodeId {
        self.id.clone()
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

impl<Load, NodeId> fmt::Display for ArenaNode<Load, NodeId>
where
    Load: fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Arena index {:?}, children: {:?}, payload: {} ",
            self.index, self.children, self.load
        )
    }
}

/// Iterable tree that uses arena allocation and allows for unoptimized (slower) depth-first
/// traversal. Can be converted to a [DepthFirstIterable] implementation, namely
/// [DepthFirstArenaTree], via a trait method or with `into()`
///
/// The tree is mutable, that is, adding nodes possible, unlike in
/// the trees optimized for a single direction.
#[derive(Debug)]
pub struct DirectedArenaTree<Load, NodeId> {
    /// Memory allocated area for nodes
    pub(super) nodes: Vec<ArenaNode<Load, NodeId>>,

    pub(super) max_depth: usize,

    /// Lookup arena indices
    pub(super) lookup: HashMap<NodeId, ArenaIndex>,
}

impl<Load, NodeId> DirectedArenaTree<Load, NodeId> {
    pub fn with_capacity(capacity: usize) -> Self {
        DirectedArenaTree {
            nodes: Vec::with_capacity(capacity),
            max_depth: 0,
            lookup: HashMap::with_capacity(capacity),
        }
    }

    pub fn new() -> Self {
        DirectedArenaTree {
            nodes: vec![],
            max_depth: 0,
            lookup: HashMap::new(),
        }
    }
}

impl<Load, NodeId> Default for DirectedArenaTree<Load, NodeId> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Load, NodeId> BaseDirectionIterable<Load, NodeId> for DirectedArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    type Node = ArenaNode<Load, NodeId>;

    fn root(&self) -> Result<&Self::Node, MarionetteError<NodeId>> {
        self.nodes.first().ok_or(MarionetteError::RootNotSet)
    }

    fn children(&self, node: &Self::Node) -> Result<Vec<&Self::Node>, MarionetteError<NodeId>> {
        node.children
            .iter()
            .map(|index| {
                self.nodes
                    .get(index.0)
                    .ok_or(MarionetteError::ReferenceOutOfBound(index.0))
            })
            .collect()
    }

    fn node_by_id(&self, node_id: &NodeId) -> Option<&Self::Node> {
        let index = self.lookup.get(node_id)?;
        self.nodes.get(index.0)
    }

    fn nodes(&self) -> &[Self::Node] {
        &self.nodes
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<Load, NodeId> DirectionIterable<Load, NodeId> for DirectedArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    fn iter_depth(&self) -> impl Iterator<Item = &Self::Node> {
        DepthFirstIterator::new(self, self.nodes.first().map(|root| root.index))
    }

    fn iter_depth_sub(&self, root: &Self::Node) -> impl Iterator<Item = &Self::Node> {
        DepthFirstIterator::new(self, Some(root.index))
    }

    fn add(&mut self, load: Load, node_id: NodeId, parent: &NodeId) -> Result<NodeId, MarionetteError<NodeId>> {
        let parent_index = *self
            .lookup
            .get(parent)
            .ok_or_else(|| MarionetteError::UnknownNode(parent.clone()))?;

        // First check whether we can add the node (id not used yet)
        if self.lookup.contains_key(&node_id) {
            return Err(MarionetteError::NotUnique(node_id));
        }

        // * Get the new node's depth
        // * update the parent's width and add the node as a child
        // * update the widths of all ancestors
        let index = ArenaIndex(self.nodes.len());
        let parent = self
            .nodes
            .get_mut(parent_index.0)
            .ok_or(MarionetteError::ReferenceOutOfBound(parent_index.0))?;
        parent.children.push(index);
        parent.width += 1;
        let depth = parent.depth + 1;

        let mut ancestor_ref = parent.parent_ref;
        while let Some(ancestor_index) = ancestor_ref {
            let ancestor = self
                .nodes
                .get_mut(ancestor_index.0)
                .ok_or(MarionetteError::ReferenceOutOfBound(ancestor_index.0))?;
            ancestor.width += 1;
            ancestor_ref = ancestor.parent_ref;
        }

        self.max_depth = self.max_depth.max(depth + 1);
        self.lookup.insert(node_id.clone(), index);
        self.nodes.push(ArenaNode {
            load,
            index,
            id: node_id.clone(),
            children: vec![],
            width: 1,
            depth,
            parent_ref: Some(parent_index),
        });
        Ok(node_id)
    }

    fn set_root(&mut self, root_load: Load, root_id: NodeId) -> NodeId {
        self.nodes.clear();
        self.lookup.clear();
        self.lookup.insert(root_id.clone(), ArenaIndex(0));
        self.nodes.push(ArenaNode {
            load: root_load,
            index: ArenaIndex(0),
            id: root_id.clone(),
            children: vec![],
            width: 1,
            depth: 0,
            parent_ref: None,
        });
        self.max_depth = 1;
        root_id
    }

    fn depth_first(self) -> impl DepthFirstIterable<Load, NodeId> {
        DepthFirstArenaTree::from(self)
    }
}

/// Iterator for a depth-first iteration when the data is not already sorted accordingly
pub struct DepthFirstIterator<'a, Load, NodeId> {
    tree: &'a DirectedArenaTree<Load, NodeId>,
    stack: Vec<std::slice::Iter<'a, ArenaIndex>>,
    root: Option<ArenaIndex>,
}

impl<'a, Load, NodeId> DepthFirstIterator<'a, Load, NodeId> {
    pub fn new(tree: &'a DirectedArenaTree<Load, NodeId>, root: Option<ArenaIndex>) -> Self {
        DepthFirstIterator {
            tree,
            stack: Vec::with_capacity(tree.max_depth),
            root,
        }
    }
}

impl<'a, Load, NodeId> Iterator for DepthFirstIterator<'a, Load, NodeId> {
    type Item = &'a ArenaNode<Load, NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            let root = self.tree.nodes.get(root.0)?;
            self.stack.push(root.children.iter());
            return Some(root);
        }
        while let Some(last) = self.stack.last_mut() {
            match last.next() {
                Some(child_ref) => {
                    let node = self.tree.nodes.get(child_ref.0)?;
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
