//! Data structure representing an arena tree in which the arena is sorted in depth-first
//! order for faster access

use super::{
    iterables::OptimizedDirectionIterable,
    utils::{invert_permutation, permute},
    ArenaIndex, ArenaNode, BaseDirectionIterable, DepthFirstIterable, DirectedArenaTree, DirectionIterable,
};
use crate::MarionetteError;
use itertools::Itertools;
use std::{fmt::Debug, hash::Hash};

#[derive(Debug)]
pub struct DepthFirstArenaTree<Load, NodeId>(DirectedArenaTree<Load, NodeId>);

impl<Load, NodeId> From<DirectedArenaTree<Load, NodeId>> for DepthFirstArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    fn from(mut value: DirectedArenaTree<Load, NodeId>) -> Self {
        // sorts the order of nodes such that depth-first descent is a slice iteration
        let order = value.iter_depth().map(|node| node.index).collect_vec();
        let new_index = invert_permutation(&order);
        let remap = |index: &mut ArenaIndex| *index = new_index[index.0];

        value.nodes = permute(std::mem::take(&mut value.nodes), &order);
        value.nodes.iter_mut().for_each(|node| {
            remap(&mut node.index);
            node.children.iter_mut().for_each(remap);
            node.parent_ref.iter_mut().for_each(remap);
        });

        value.lookup.clear();
        value.nodes.iter().for_each(|node| {
            value.lookup.insert(node.id.clone(), node.index);
        });
        Self(value)
    }
}

impl<Load, NodeId> DepthFirstArenaTree<Load, NodeId> {
    /// Node at an arena index
    pub fn get(&self, index: ArenaIndex) -> Option<&ArenaNode<Load, NodeId>> {
        self.0.nodes.get(index.0)
    }

    pub fn get_mut(&mut self, index: ArenaIndex) -> Option<&mut ArenaNode<Load, NodeId>> {
        self.0.nodes.get_mut(index.0)
    }
}

impl<Load, NodeId> BaseDirectionIterable<Load, NodeId> for DepthFirstArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    type Node = ArenaNode<Load, NodeId>;

    fn root(&self) -> Result<&Self::Node, MarionetteError<NodeId>> {
        self.0.root()
    }

    fn children(&self, node: &Self::Node) -> Result<Vec<&Self::Node>, MarionetteError<NodeId>> {
        self.0.children(node)
    }

    fn node_by_id(&self, node_id: &NodeId) -> Option<&Self::Node> {
        self.0.node_by_id(node_id)
    }

    fn nodes(&self) -> &[Self::Node] {
        self.0.nodes()
    }

    fn max_depth(&self) -> usize {
        self.0.max_depth
    }
}

impl<Load, NodeId> OptimizedDirectionIterable<Load, NodeId> for DepthFirstArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    fn iter(&self) -> impl Iterator<Item = &Self::Node> {
        self.0.nodes.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Self::Node> {
        self.0.nodes.iter_mut()
    }
}

impl<Load, NodeId> DepthFirstIterable<Load, NodeId> for DepthFirstArenaTree<Load, NodeId>
where
    Load: Debug + 'static,
    NodeId: Eq + Clone + Hash + Debug + 'static,
{
    fn iter_sub(&self, root: &Self::Node) -> impl Iterator<Item = &Self::Node> {
        let (start, width) = (root.index.0, root.width);
        self.0.nodes[start..start + width].iter()
    }

    fn node_by_id_mut(&mut self, node_id: &NodeId) -> Option<&mut Self::Node> {
        let index = self.0.lookup.get(node_id)?;
        self.0.nodes.get_mut(index.0)
    }
}
