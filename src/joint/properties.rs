//! Joint properties that ride along with a joint but take no part in the kinematics.

use std::collections::BTreeMap;

/// Free-form, non-standard attributes of description elements.
pub type Attributes = BTreeMap<String, String>;

/// Reference positions of the joint, used to calibrate its absolute position.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    pub rising: f64,
    pub falling: f64,
    pub reference_position: f64,
}

/// Physical properties of the joint used by dynamics simulations.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dynamics {
    pub damping: f64,
    pub friction: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attr: Attributes,
}

impl Dynamics {
    pub fn new(damping: f64, friction: f64) -> Self {
        Dynamics {
            damping,
            friction,
            attr: Attributes::new(),
        }
    }
}

/// Safety controller properties.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyController {
    pub k_velocity: f64,
    pub k_position: f64,
    pub soft_lower_limit: f64,
    pub soft_upper_limit: f64,
}

impl SafetyController {
    pub fn new(k_velocity: f64) -> Self {
        SafetyController {
            k_velocity,
            ..Default::default()
        }
    }
}
