//! Serialization of joints. Only the static description and the position are written; the
//! current, world-relative geometry is recomputed when the joint is placed again.

use super::{Attributes, Axis, Calibration, Dynamics, Joint, JointKind, Limit, Mimic, SafetyController};
use crate::geometry::Frame;
use serde::{Deserialize, Serialize};

/// Flat record of a [Joint]'s static fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: JointKind,
    pub parent: String,
    pub child: String,
    #[serde(default)]
    pub origin: Frame,
    #[serde(default)]
    pub axis: Axis,
    #[serde(default)]
    pub calibration: Option<Calibration>,
    #[serde(default)]
    pub dynamics: Option<Dynamics>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub safety_controller: Option<SafetyController>,
    #[serde(default)]
    pub mimic: Option<Mimic>,
    #[serde(default)]
    pub attr: Attributes,
    #[serde(default)]
    pub position: f64,
}

impl From<Joint> for JointData {
    fn from(joint: Joint) -> Self {
        JointData {
            name: joint.name,
            kind: joint.kind,
            parent: joint.parent,
            child: joint.child,
            origin: joint.origin,
            axis: joint.axis,
            calibration: joint.calibration,
            dynamics: joint.dynamics,
            limit: joint.limit,
            safety_controller: joint.safety_controller,
            mimic: joint.mimic,
            attr: joint.attr,
            position: joint.position,
        }
    }
}

impl From<JointData> for Joint {
    fn from(data: JointData) -> Self {
        let mut joint = Joint::new(data.name, data.kind, data.parent, data.child)
            .with_origin(data.origin)
            .with_axis(data.axis);
        joint.limit = data.limit;
        joint.mimic = data.mimic;
        joint.calibration = data.calibration;
        joint.dynamics = data.dynamics;
        joint.safety_controller = data.safety_controller;
        joint.attr = data.attr;
        joint.set_position(data.position);
        joint
    }
}

impl Serialize for Joint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JointData::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Joint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JointData::deserialize(deserializer).map(Joint::from)
    }
}
