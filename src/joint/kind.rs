//! Joint types and the transformation rule belonging to each of them.

use super::{Axis, Joint};
use crate::geometry::{rotation_about_axis, translation_along, Frame};
use crate::MarionetteError;
use core::fmt;
use nalgebra::Isometry3;
use std::str::FromStr;

/// Signature of a transformation rule: the joint, the frame its motion pivots on, the axis
/// of motion (both in the same coordinate system) and the position.
pub type TransformationRule = fn(&Joint, &Frame, &Axis, f64) -> Result<Isometry3<f64>, MarionetteError>;

/// The type of a joint. The discriminants are the numeric type indices of robot
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JointKind {
    /// Rotation about the axis within limits
    Revolute = 0,
    /// Rotation about the axis without limits
    Continuous = 1,
    /// Translation along the axis within limits
    Prismatic = 2,
    /// No motion at all
    Fixed = 3,
    /// All 6 degrees of freedom
    Floating = 4,
    /// Motion in the plane perpendicular to the axis
    Planar = 5,
}

impl JointKind {
    pub const SUPPORTED: [JointKind; 6] = [
        JointKind::Revolute,
        JointKind::Continuous,
        JointKind::Prismatic,
        JointKind::Fixed,
        JointKind::Floating,
        JointKind::Planar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JointKind::Revolute => "revolute",
            JointKind::Continuous => "continuous",
            JointKind::Prismatic => "prismatic",
            JointKind::Fixed => "fixed",
            JointKind::Floating => "floating",
            JointKind::Planar => "planar",
        }
    }

    /// Whether the transformation requires a [Limit](super::Limit).
    pub fn requires_limit(&self) -> bool {
        matches!(self, JointKind::Revolute | JointKind::Prismatic)
    }

    /// The transformation rule of this kind. Resolved once per joint on construction.
    pub(crate) fn rule(&self) -> TransformationRule {
        match self {
            JointKind::Revolute => revolute,
            JointKind::Continuous => continuous,
            JointKind::Prismatic => prismatic,
            JointKind::Fixed => fixed,
            JointKind::Floating | JointKind::Planar => not_implemented,
        }
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JointKind {
    type Err = MarionetteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointKind::SUPPORTED
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| MarionetteError::UnsupportedKind(s.to_string()))
    }
}

impl TryFrom<usize> for JointKind {
    type Error = MarionetteError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        JointKind::SUPPORTED
            .get(value)
            .copied()
            .ok_or_else(|| MarionetteError::UnsupportedKind(value.to_string()))
    }
}

fn fixed(_joint: &Joint, _origin: &Frame, _axis: &Axis, _position: f64) -> Result<Isometry3<f64>, MarionetteError> {
    Ok(Isometry3::identity())
}

fn revolute(joint: &Joint, origin: &Frame, axis: &Axis, position: f64) -> Result<Isometry3<f64>, MarionetteError> {
    let position = joint.required_limit()?.clamp(position);
    continuous(joint, origin, axis, position)
}

fn continuous(_joint: &Joint, origin: &Frame, axis: &Axis, position: f64) -> Result<Isometry3<f64>, MarionetteError> {
    Ok(rotation_about_axis(axis.vector(), position, origin.point()))
}

fn prismatic(joint: &Joint, _origin: &Frame, axis: &Axis, position: f64) -> Result<Isometry3<f64>, MarionetteError> {
    let position = joint.required_limit()?.clamp(position);
    Ok(translation_along(&(axis.vector() * position)))
}

fn not_implemented(joint: &Joint, _origin: &Frame, _axis: &Axis, _position: f64) -> Result<Isometry3<f64>, MarionetteError> {
    Err(MarionetteError::NotImplemented {
        joint: joint.name().to_string(),
        kind: joint.kind(),
    })
}
