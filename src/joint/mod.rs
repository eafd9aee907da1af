//! Joints: the edges of the kinematic tree and the state machine that turns a joint
//! position into a rigid transformation.
//!
//! A joint holds two sets of geometry. The *static* [origin](Joint::origin) and
//! [axis](Joint::axis) are relative to the parent link and never change once the joint is
//! built. The *current* origin and axis are world relative and are recomputed by
//! [place](Joint::place) whenever the owning [Marionette](crate::Marionette) propagates a
//! configuration.

mod axis;
#[cfg(feature = "serde")]
mod data;
mod kind;
mod limit;
mod mimic;
mod properties;

pub use axis::Axis;
#[cfg(feature = "serde")]
pub use data::JointData;
pub use kind::{JointKind, TransformationRule};
pub use limit::Limit;
pub use mimic::Mimic;
pub use properties::{Attributes, Calibration, Dynamics, SafetyController};

use crate::geometry::Frame;
use crate::MarionetteError;
use core::fmt;
use nalgebra::Isometry3;

/// Representation of the kinematics of a joint, its limits and auxiliary properties.
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    kind: JointKind,
    parent: String,
    child: String,
    origin: Frame,
    axis: Axis,
    limit: Option<Limit>,
    mimic: Option<Mimic>,
    pub calibration: Option<Calibration>,
    pub dynamics: Option<Dynamics>,
    pub safety_controller: Option<SafetyController>,
    /// Non-standard attributes
    pub attr: Attributes,
    position: f64,
    /// Accumulated factor of all calls to [Joint::scale]
    scale_factor: f64,
    current_origin: Frame,
    current_axis: Axis,
    rule: TransformationRule,
}

impl Joint {
    /// Creates a joint of `kind` connecting the `parent` link to the `child` link. The origin
    /// defaults to the parent's frame and the axis to `(1, 0, 0)`.
    pub fn new(name: impl Into<String>, kind: JointKind, parent: impl Into<String>, child: impl Into<String>) -> Self {
        Joint {
            name: name.into(),
            kind,
            parent: parent.into(),
            child: child.into(),
            origin: Frame::worldxy(),
            axis: Axis::default(),
            limit: None,
            mimic: None,
            calibration: None,
            dynamics: None,
            safety_controller: None,
            attr: Attributes::new(),
            position: 0.0,
            scale_factor: 1.0,
            current_origin: Frame::worldxy(),
            current_axis: Axis::default(),
            rule: kind.rule(),
        }
    }

    pub fn with_origin(mut self, origin: Frame) -> Self {
        self.origin = origin;
        self.current_origin = origin;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.current_axis = axis.clone();
        self.axis = axis;
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_mimic(mut self, mimic: Mimic) -> Self {
        self.mimic = Some(mimic);
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn with_dynamics(mut self, dynamics: Dynamics) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    pub fn with_safety_controller(mut self, safety_controller: SafetyController) -> Self {
        self.safety_controller = Some(safety_controller);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// Name of the parent link
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Name of the child link
    pub fn child(&self) -> &str {
        &self.child
    }

    /// Static origin, relative to the parent link
    pub fn origin(&self) -> &Frame {
        &self.origin
    }

    /// Static axis, relative to the joint's origin
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    pub fn mimic(&self) -> Option<&Mimic> {
        self.mimic.as_ref()
    }

    /// Current position: radians for rotational joints, length units for prismatic joints.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// World-relative origin as of the last propagation
    pub fn current_origin(&self) -> &Frame {
        &self.current_origin
    }

    /// World-relative axis as of the last propagation
    pub fn current_axis(&self) -> &Axis {
        &self.current_axis
    }

    /// The transformation of the current origin
    pub fn current_transformation(&self) -> Isometry3<f64> {
        self.current_origin.to_isometry()
    }

    /// Sets the position, clamped into the limits of revolute and prismatic joints.
    pub fn set_position(&mut self, position: f64) {
        self.position = self.clamp_position(position);
    }

    /// The position this joint would take for `position`: clamped into the limits of
    /// revolute and prismatic joints, unchanged otherwise.
    pub fn clamp_position(&self, position: f64) -> f64 {
        match (&self.limit, self.kind.requires_limit()) {
            (Some(limit), true) if !limit.contains(position) => limit.clamp(position),
            _ => position,
        }
    }

    /// A joint can be configured directly unless it is fixed or mimics another joint.
    pub fn is_configurable(&self) -> bool {
        self.kind != JointKind::Fixed && self.mimic.is_none()
    }

    /// Only planar and prismatic joints have limits measured in length units.
    pub fn is_scalable(&self) -> bool {
        matches!(self.kind, JointKind::Planar | JointKind::Prismatic)
    }

    /// Scale the current origin and, for scalable joints, the limit by `factor`.
    ///
    /// The static origin stays untouched; the factor is remembered and applied to its
    /// translation when the joint is [placed](Joint::place) again.
    pub fn scale(&mut self, factor: f64) {
        self.current_origin.scale(factor);
        self.scale_factor *= factor;
        if self.is_scalable() {
            if let Some(limit) = self.limit.as_mut() {
                limit.scale(factor);
            }
        }
    }

    /// Transform the current origin and axis in place.
    pub fn transform(&mut self, transformation: &Isometry3<f64>) {
        self.current_origin.transform(transformation);
        self.current_axis.transform(transformation);
    }

    /// Places the joint in the world: the current origin becomes the (scaled) static origin
    /// transformed by the world transformation of the parent link, the current axis the
    /// static axis expressed in that frame.
    pub fn place(&mut self, parent: &Isometry3<f64>) {
        self.current_origin = self.origin.scaled(self.scale_factor).transformed(parent);
        self.current_axis = self.axis.clone();
        self.current_axis.transform(&self.current_transformation());
    }

    /// The world-space transformation moving the child link for `position`, computed with
    /// the current origin and axis. Fails for revolute and prismatic joints without a limit
    /// and for floating and planar joints.
    pub fn calculate_transformation(&self, position: f64) -> Result<Isometry3<f64>, MarionetteError> {
        (self.rule)(self, &self.current_origin, &self.current_axis, position)
    }

    /// The transformation from the parent link to the child link for `position`. Unlike
    /// [calculate_transformation](Joint::calculate_transformation), this depends on the
    /// static geometry only.
    pub fn local_transformation(&self, position: f64) -> Result<Isometry3<f64>, MarionetteError> {
        let motion = (self.rule)(self, &Frame::worldxy(), &self.axis, position)?;
        Ok(self.origin.scaled(self.scale_factor).to_isometry() * motion)
    }

    pub(crate) fn required_limit(&self) -> Result<&Limit, MarionetteError> {
        self.limit.as_ref().ok_or_else(|| MarionetteError::MissingLimit {
            joint: self.name.clone(),
            kind: self.kind,
        })
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Joint `{}` ({}), {} -> {}, axis: {}, position: {}",
            self.name, self.kind, self.parent, self.child, self.current_axis, self.position
        )
    }
}
