//! Rigid-body geometry on top of [nalgebra]. Rigid transformations are plain
//! [Isometry3] values; this module adds the [Frame] type and the few constructors the
//! joint rules need.

use core::fmt;
use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

/// Creates a rotation by `angle` (radians) about `axis`, pivoting at `point`.
///
/// A zero-length axis does not describe a rotation; the identity is returned.
pub fn rotation_about_axis(axis: &Vector3<f64>, angle: f64, point: &Point3<f64>) -> Isometry3<f64> {
    let Some(axis) = Unit::try_new(*axis, 0.0) else {
        return Isometry3::identity();
    };
    let rotation = UnitQuaternion::from_axis_angle(&axis, angle);
    // T(p) * R * T(-p)
    let translation = point.coords - rotation * point.coords;
    Isometry3::from_parts(Translation3::from(translation), rotation)
}

/// Creates a translation along `vector`.
pub fn translation_along(vector: &Vector3<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::from(*vector), UnitQuaternion::identity())
}

/// A right-handed, orthonormal coordinate frame given by a reference point and two axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    point: Point3<f64>,
    xaxis: Vector3<f64>,
    yaxis: Vector3<f64>,
}

impl Frame {
    /// Constructor. The axes are orthonormalized: `xaxis` is normalized and `yaxis` is made
    /// perpendicular to it within the plane they span. Degenerate input (zero or parallel
    /// axes) falls back to the world axes.
    pub fn new(point: Point3<f64>, xaxis: Vector3<f64>, yaxis: Vector3<f64>) -> Self {
        let zaxis = xaxis.cross(&yaxis);
        match (xaxis.try_normalize(f64::EPSILON), zaxis.try_normalize(f64::EPSILON)) {
            (Some(xaxis), Some(zaxis)) => Frame {
                point,
                xaxis,
                yaxis: zaxis.cross(&xaxis),
            },
            _ => Frame {
                point,
                ..Frame::worldxy()
            },
        }
    }

    /// The world XY frame at the origin.
    pub fn worldxy() -> Self {
        Frame {
            point: Point3::origin(),
            xaxis: Vector3::x(),
            yaxis: Vector3::y(),
        }
    }

    /// Frame from a translation and roll/pitch/yaw angles (extrinsic X, Y, Z), which is how
    /// robot descriptions usually state a joint origin.
    pub fn from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]);
        Self::from_isometry(&Isometry3::from_parts(Translation3::new(xyz[0], xyz[1], xyz[2]), rotation))
    }

    /// The frame a transformation maps the world XY frame onto.
    pub fn from_isometry(isometry: &Isometry3<f64>) -> Self {
        Frame {
            point: Point3::from(isometry.translation.vector),
            xaxis: isometry.rotation * Vector3::x(),
            yaxis: isometry.rotation * Vector3::y(),
        }
    }

    /// The transformation mapping the world XY frame onto this frame.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            self.xaxis,
            self.yaxis,
            self.zaxis(),
        ]));
        Isometry3::from_parts(
            Translation3::from(self.point.coords),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }

    pub fn point(&self) -> &Point3<f64> {
        &self.point
    }

    pub fn xaxis(&self) -> &Vector3<f64> {
        &self.xaxis
    }

    pub fn yaxis(&self) -> &Vector3<f64> {
        &self.yaxis
    }

    pub fn zaxis(&self) -> Vector3<f64> {
        self.xaxis.cross(&self.yaxis)
    }

    /// Transform the frame in place.
    pub fn transform(&mut self, transformation: &Isometry3<f64>) {
        self.point = transformation * self.point;
        self.xaxis = transformation * self.xaxis;
        self.yaxis = transformation * self.yaxis;
    }

    /// Return a transformed copy of the frame.
    pub fn transformed(&self, transformation: &Isometry3<f64>) -> Self {
        let mut result = *self;
        result.transform(transformation);
        result
    }

    /// Scale the reference point (i.e., the translation) by `factor`. The axes are unit
    /// vectors and stay as they are.
    pub fn scale(&mut self, factor: f64) {
        self.point *= factor;
    }

    /// Return a copy with the reference point scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut result = *self;
        result.scale(factor);
        result
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::worldxy()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame(point: [{:.3}, {:.3}, {:.3}], xaxis: [{:.3}, {:.3}, {:.3}], yaxis: [{:.3}, {:.3}, {:.3}])",
            self.point.x,
            self.point.y,
            self.point.z,
            self.xaxis.x,
            self.xaxis.y,
            self.xaxis.z,
            self.yaxis.x,
            self.yaxis.y,
            self.yaxis.z
        )
    }
}
