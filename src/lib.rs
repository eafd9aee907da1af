//! ## About
//!
//! This crate computes the forward kinematics of articulated mechanisms such as robots: a tree
//! of rigid links connected by joints, described the way robot description formats (URDF)
//! describe them. Given joint positions, it computes where every joint and link ends up in
//! world space.
//!
//! See the [Marionette] struct to get started.
//!
//! * [Joint] models a joint of one of the [JointKind]s, together with its [Axis], [Limit] and
//!   an optional [Mimic] relation to another joint
//! * [Marionette] owns the kinematic tree and keeps the current geometry of joints and links
//!   in sync with the joint positions
//! * [Forward] computes link transformations for a joint state without mutating the model
//! * [arena] contains the tree structures everything is built upon
//!
//! ## Features
//!
//! * `serde` – (de)serialization of joints, links and frames
//! * `rayon` – [par_forward_kinematics] for batches of joint states
//!
//! ## Naming conventions
//! * Traits – adjectives that indicate capability and behavior
//! * Structs – substantives that indicate entities implementing a behavior
//! * Methods – imperative forms with the exception of getters and factories, which
//!             use substantives (i.e., omit a `get_` prefix) much like the standard library.

pub mod arena;
pub mod errors;
pub mod forward;
pub mod geometry;
pub mod joint;
pub mod link;
pub mod marionette;
pub mod rigid;

pub use arena::{
    ArenaIndex, ArenaNode, BaseDirectionIterable, DepthFirstArenaTree, DepthFirstIterable, DirectedArenaTree,
    DirectionIterable, Nodelike, OptimizedDirectionIterable,
};
pub use errors::MarionetteError;
#[cfg(feature = "rayon")]
pub use forward::par_forward_kinematics;
pub use forward::Forward;
pub use geometry::Frame;
pub use joint::{Axis, Joint, JointKind, Limit, Mimic};
pub use link::{Link, LinkNode};
pub use marionette::{JointState, Marionette};
pub use rigid::{Rigid, TransformationAccumulation};
