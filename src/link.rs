//! Links (rigid bodies) and the payload of the kinematic tree's nodes.

use crate::geometry::Frame;
use crate::joint::{Attributes, Joint};
use crate::rigid::Rigid;
use crate::MarionetteError;
use core::fmt;
use nalgebra::Isometry3;

/// A rigid body of the mechanism. Visual and collision geometry are attached elsewhere; the
/// kinematics only need its identity.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attr: Attributes,
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Link {
            name: name.into(),
            attr: Attributes::new(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link `{}`", self.name)
    }
}

/// Load of a node in the kinematic tree: a link together with the joint connecting it to its
/// parent (`None` for the root link) and the link's world transformation.
#[derive(Debug, Clone)]
pub struct LinkNode {
    link: Link,
    joint: Option<Joint>,
    transformation: Isometry3<f64>,
}

impl LinkNode {
    pub(crate) fn new(link: Link, joint: Option<Joint>) -> Self {
        LinkNode {
            link,
            joint,
            transformation: Isometry3::identity(),
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    /// The joint connecting the link to its parent
    pub fn joint(&self) -> Option<&Joint> {
        self.joint.as_ref()
    }

    pub(crate) fn joint_mut(&mut self) -> Option<&mut Joint> {
        self.joint.as_mut()
    }

    /// World transformation of the link as of the last propagation
    pub fn world_transformation(&self) -> &Isometry3<f64> {
        &self.transformation
    }

    pub fn frame(&self) -> Frame {
        Frame::from_isometry(&self.transformation)
    }

    pub(crate) fn set_world_transformation(&mut self, transformation: Isometry3<f64>) {
        self.transformation = transformation;
    }

    pub(crate) fn transform(&mut self, transformation: &Isometry3<f64>) {
        self.transformation = transformation * self.transformation;
        if let Some(joint) = self.joint.as_mut() {
            joint.transform(transformation);
        }
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.transformation.translation.vector *= factor;
        if let Some(joint) = self.joint.as_mut() {
            joint.scale(factor);
        }
    }
}

impl fmt::Display for LinkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.joint {
            Some(joint) => write!(f, "{} via `{}`", self.link, joint.name()),
            None => write!(f, "{} (root)", self.link),
        }
    }
}

impl Rigid for LinkNode {
    type Transformation = Isometry3<f64>;

    type Parameter = f64;

    fn transformation(&self, param: &Self::Parameter) -> Result<Self::Transformation, MarionetteError> {
        match &self.joint {
            Some(joint) => joint.local_transformation(*param),
            None => Ok(Self::neutral_element()),
        }
    }

    fn neutral_element() -> Self::Transformation {
        Isometry3::identity()
    }

    fn concat(first: &Self::Transformation, second: &Self::Transformation) -> Self::Transformation {
        first * second
    }
}
