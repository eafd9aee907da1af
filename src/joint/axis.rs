//! The direction a joint rotates about or slides along.

use super::properties::Attributes;
use core::fmt;
use nalgebra::{Isometry3, Vector3};

/// Representation of a joint axis.
///
/// Stored as a unit vector, except for the degenerate case of a zero vector, which is kept
/// as is: a fixed joint may declare an axis it never uses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "AxisData"))]
pub struct Axis {
    vector: Vector3<f64>,
    /// Additional, non-standard attributes
    #[cfg_attr(feature = "serde", serde(default))]
    pub attr: Attributes,
}

impl Axis {
    pub fn new(xyz: [f64; 3]) -> Self {
        Self::from_vector(Vector3::from(xyz))
    }

    /// Normalizes `vector`. Dividing by the largest component first keeps extreme but
    /// finite vectors from under- or overflowing the norm.
    pub fn from_vector(vector: Vector3<f64>) -> Self {
        let largest = vector.amax();
        let vector = if largest > 0.0 {
            (vector / largest).normalize()
        } else {
            Vector3::zeros()
        };
        Axis {
            vector,
            attr: Attributes::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr.insert(key.into(), value.into());
        self
    }

    pub fn vector(&self) -> &Vector3<f64> {
        &self.vector
    }

    pub fn x(&self) -> f64 {
        self.vector.x
    }

    pub fn y(&self) -> f64 {
        self.vector.y
    }

    pub fn z(&self) -> f64 {
        self.vector.z
    }

    pub fn is_zero(&self) -> bool {
        self.vector == Vector3::zeros()
    }

    /// Transform the axis in place. Only the rotational part applies to a direction.
    pub fn transform(&mut self, transformation: &Isometry3<f64>) {
        self.vector = transformation * self.vector;
    }

    /// Return the transformed direction, leaving `self` untouched.
    pub fn transformed(&self, transformation: &Isometry3<f64>) -> Vector3<f64> {
        transformation * self.vector
    }
}

/// Deserialized form of an [Axis], normalized on conversion
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct AxisData {
    vector: Vector3<f64>,
    #[serde(default)]
    attr: Attributes,
}

#[cfg(feature = "serde")]
impl From<AxisData> for Axis {
    fn from(data: AxisData) -> Self {
        Axis {
            attr: data.attr,
            ..Axis::from_vector(data.vector)
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new([1.0, 0.0, 0.0])
    }
}

impl From<Vector3<f64>> for Axis {
    fn from(vector: Vector3<f64>) -> Self {
        Self::from_vector(vector)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x(), self.y(), self.z())
    }
}
