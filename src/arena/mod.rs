//! [Arena memory allocated](https://en.wikipedia.org/wiki/Region-based_memory_management)
//! tree structures for fast, top-down traversal.
//!
//! A tree is built as a [DirectedArenaTree] (nodes in insertion order, adding nodes is
//! cheap, depth-first iteration follows child references) and then converted into a
//! [DepthFirstArenaTree], whose arena is sorted in depth-first order such that a top-down
//! traversal is a plain slice iteration.

pub mod depth;
pub mod directed;
pub mod iterables;
mod utils;

pub use depth::DepthFirstArenaTree;
pub use directed::{ArenaIndex, ArenaNode, DepthFirstIterator, DirectedArenaTree};
pub use iterables::{
    BaseDirectionIterable, DepthFirstIterable, DirectionIterable, Nodelike, OptimizedDirectionIterable,
};
