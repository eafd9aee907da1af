//! Provides the error type used throughout this crate.

use crate::joint::JointKind;
use thiserror::Error;

/// The error type used throughout this crate.
///
/// It is generic over the node identifier of the [arena](crate::arena) tree; everywhere else
/// joints and links are identified by their names, hence the default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarionetteError<NodeId = String> {
    // Joint errors
    #[error("Unsupported joint type: {0}")]
    UnsupportedKind(String),
    #[error("{kind} joint `{joint}` is required to define a limit")]
    MissingLimit { joint: String, kind: JointKind },
    #[error("Transformation of {kind} joint `{joint}` is not implemented")]
    NotImplemented { joint: String, kind: JointKind },
    #[error("Joint `{0}` is not configurable")]
    NotConfigurable(String),
    #[error("Mimic relations form a cycle: {}", .0.join(" -> "))]
    MimicCycle(Vec<String>),
    #[error("Unknown joint: {0}")]
    UnknownJoint(String),
    #[error("Unknown link: {0}")]
    UnknownLink(String),

    // Structural errors
    #[error("No root link found")]
    RootNotSet,
    #[error("More than one root link: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
    #[error("Link `{0}` is the child of more than one joint")]
    MultipleParents(String),
    #[error("Links not reachable from the root: {}", .0.join(", "))]
    Unreachable(Vec<String>),

    // Internal errors
    #[error("Node reference {0} is out of bound")]
    ReferenceOutOfBound(usize),
    #[error("Node not in tree: {0}")]
    UnknownNode(NodeId),
    #[error("ID not unique: {0}")]
    NotUnique(NodeId),
}
