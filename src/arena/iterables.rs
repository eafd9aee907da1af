//! Definition of the interfaces for tree iteration
use crate::MarionetteError;
use std::{fmt::Debug, hash::Hash};

/// Container that holds data in a tree
pub trait Nodelike<Load, NodeId> {
    fn is_leaf(&self) -> bool;
    fn get(&self) -> &Load;
    fn get_mut(&mut self) -> &mut Load;

    fn id(&self) -> NodeId;
    /// Get the node's distance to the root node. Required for computing accumulations.
    fn depth(&self) -> usize;
}

pub trait BaseDirectionIterable<Load, NodeId>
where
    NodeId: Eq + Clone + Hash + Debug,
{
    type Node: 'static + Nodelike<Load, NodeId> + Debug;

    fn root(&self) -> Result<&Self::Node, MarionetteError<NodeId>>;
    fn children(&self, node: &Self::Node) -> Result<Vec<&Self::Node>, MarionetteError<NodeId>>;
    fn node_by_id(&self, node_id: &NodeId) -> Option<&Self::Node>;
    fn nodes(&self) -> &[Self::Node];

    /// Longest path from the root (in nodes). Used to preallocate traversal stacks.
    fn max_depth(&self) -> usize;

    fn len(&self) -> usize {
        self.nodes().len()
    }

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

/// A mutable tree that can be traversed depth-first by following child references.
///
/// Nodes can be added until the tree is converted into an optimized layout with
/// [DirectionIterable::depth_first].
pub trait DirectionIterable<Load, NodeId>: BaseDirectionIterable<Load, NodeId>
where
    NodeId: Eq + Clone + Hash + Debug,
{
    fn iter_depth(&self) -> impl Iterator<Item = &Self::Node>;
    fn iter_depth_sub(&self, root: &Self::Node) -> impl Iterator<Item = &Self::Node>;

    /// Add a new node as the last child of `parent`
    fn add(&mut self, load: Load, node_id: NodeId, parent: &NodeId) -> Result<NodeId, MarionetteError<NodeId>>;

    /// Deletes all nodes and sets a new root
    fn set_root(&mut self, root_load: Load, root_id: NodeId) -> NodeId;

    /// Generate the optimized layout
    fn depth_first(self) -> impl DepthFirstIterable<Load, NodeId>;
}

/// A tree whose arena is sorted for one direction, such that iteration in that direction
/// is a slice iteration.
pub trait OptimizedDirectionIterable<Load, NodeId>: BaseDirectionIterable<Load, NodeId>
where
    NodeId: Eq + Clone + Hash + Debug,
{
    fn iter(&self) -> impl Iterator<Item = &Self::Node>;
    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Self::Node>;
}

pub trait DepthFirstIterable<Load, NodeId>: OptimizedDirectionIterable<Load, NodeId>
where
    NodeId: Eq + Clone + Hash + Debug,
{
    /// Iterate the subtree starting at (and including) `root`
    fn iter_sub(&self, root: &Self::Node) -> impl Iterator<Item = &Self::Node>;
    fn node_by_id_mut(&mut self, node_id: &NodeId) -> Option<&mut Self::Node>;
}
