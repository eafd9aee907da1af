//! Mimic relations between joints.

/// Makes a joint follow another joint:
/// `position = multiplier * mimicked_position + offset`.
///
/// The mimicked joint is referenced by name and resolved by the owning
/// [Marionette](crate::Marionette).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mimic {
    /// Name of the mimicked joint
    pub joint: String,
    pub multiplier: f64,
    pub offset: f64,
}

impl Mimic {
    pub fn new(joint: impl Into<String>) -> Self {
        Self::with_params(joint, 1.0, 0.0)
    }

    pub fn with_params(joint: impl Into<String>, multiplier: f64, offset: f64) -> Self {
        Mimic {
            joint: joint.into(),
            multiplier,
            offset,
        }
    }

    pub fn calculate_position(&self, mimicked_joint_position: f64) -> f64 {
        self.multiplier * mimicked_joint_position + self.offset
    }
}
