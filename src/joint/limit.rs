//! Joint limit properties.

use super::properties::Attributes;

/// Joint limits. `lower` and `upper` are radians for rotational joints and length units for
/// prismatic joints, `effort` and `velocity` are the actuator's capabilities.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    pub effort: f64,
    pub velocity: f64,
    pub lower: f64,
    pub upper: f64,
    /// Additional, non-standard attributes
    #[cfg_attr(feature = "serde", serde(default))]
    pub attr: Attributes,
}

impl Limit {
    pub fn new(effort: f64, velocity: f64, lower: f64, upper: f64) -> Self {
        Limit {
            effort,
            velocity,
            lower,
            upper,
            attr: Attributes::new(),
        }
    }

    /// Limit with only the position bounds set.
    pub fn bounds(lower: f64, upper: f64) -> Self {
        Self::new(0.0, 0.0, lower, upper)
    }

    /// Scale the position bounds. Effort and velocity are physical capabilities and stay
    /// unchanged.
    pub fn scale(&mut self, factor: f64) {
        self.lower *= factor;
        self.upper *= factor;
    }

    /// Clamp a position into `[lower, upper]`. Never panics: with inverted bounds the
    /// result is `lower`.
    pub fn clamp(&self, position: f64) -> f64 {
        position.min(self.upper).max(self.lower)
    }

    /// Whether `position` lies within `[lower, upper]`
    pub fn contains(&self, position: f64) -> bool {
        self.lower <= position && position <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale() {
        let mut limit = Limit::new(10.0, 2.0, -0.5, 1.5);
        limit.scale(1000.0);

        assert_relative_eq!(limit.lower, -500.0);
        assert_relative_eq!(limit.upper, 1500.0);
        assert_eq!(limit.effort, 10.0);
        assert_eq!(limit.velocity, 2.0);

        limit.scale(1e-3);
        assert_relative_eq!(limit.lower, -0.5, epsilon = 1e-12);
        assert_relative_eq!(limit.upper, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp() {
        let limit = Limit::bounds(-1.0, 1.0);
        assert_eq!(limit.clamp(2.0), 1.0);
        assert_eq!(limit.clamp(-3.0), -1.0);
        assert_eq!(limit.clamp(0.25), 0.25);
        assert_eq!(limit.clamp(limit.clamp(7.0)), limit.clamp(7.0));
        assert!(limit.contains(limit.clamp(-9.0)));

        let inverted = Limit::bounds(1.0, -1.0);
        assert_eq!(inverted.clamp(0.0), 1.0);
    }
}
