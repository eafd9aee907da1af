/*! Stateless forward kinematics: world transformations of all links for a joint state,
 * computed without touching the geometry stored in the model.
 */

use crate::arena::{BaseDirectionIterable, Nodelike, OptimizedDirectionIterable};
use crate::marionette::{joint_at, JointState, Marionette};
use crate::rigid::TransformationAccumulation;
use crate::MarionetteError;
use itertools::Itertools;
use nalgebra::Isometry3;
use std::collections::HashMap;
use tracing_attributes::instrument;

/// Trait representing a forward kinematics algorithm on a model that is left unchanged.
pub trait Forward {
    type Transformation;

    /// World transformation of each link by link name, with the root link placed at `root`.
    fn forward_kinematics(
        &self,
        state: &JointState,
        root: &Self::Transformation,
    ) -> Result<HashMap<String, Self::Transformation>, MarionetteError>;
}

impl Forward for Marionette {
    type Transformation = Isometry3<f64>;

    /// Joints missing from `state` keep their stored position; mimicking joints follow their
    /// leaders and all positions are clamped the way [Marionette::set_position] clamps them.
    #[instrument(skip_all, fields(model = %self.name()), err)]
    fn forward_kinematics(
        &self,
        state: &JointState,
        root: &Isometry3<f64>,
    ) -> Result<HashMap<String, Isometry3<f64>>, MarionetteError> {
        let positions = self.resolve_positions(state)?;
        self.tree
            .iter()
            .accumulate_transformations(&positions, *root, self.tree.max_depth())
            .map_ok(|(node, transformation)| (node.id(), transformation))
            .collect()
    }
}

/// Forward kinematics for many states in parallel.
#[cfg(feature = "rayon")]
pub fn par_forward_kinematics<F>(
    model: &F,
    states: &[JointState],
    root: &F::Transformation,
) -> Vec<Result<HashMap<String, F::Transformation>, MarionetteError>>
where
    F: Forward + Sync,
    F::Transformation: Send + Sync,
{
    use rayon::prelude::*;

    states
        .par_iter()
        .map(|state| model.forward_kinematics(state, root))
        .collect()
}

impl Marionette {
    /// Positions of all nodes in arena order for `state`. The root node gets a zero.
    pub(crate) fn resolve_positions(&self, state: &JointState) -> Result<Vec<f64>, MarionetteError> {
        for name in state.keys() {
            self.configurable_index(name)?;
        }

        let mut positions = self
            .tree
            .iter()
            .map(|node| match node.get().joint() {
                Some(joint) => state
                    .get(joint.name())
                    .map_or(joint.position(), |position| joint.clamp_position(*position)),
                None => 0.0,
            })
            .collect_vec();

        for &index in &self.mimic_order {
            let follower = joint_at(&self.tree, index)?;
            let Some(mimic) = follower.mimic() else {
                continue;
            };
            let leader = self
                .joint_lookup
                .get(&mimic.joint)
                .ok_or_else(|| MarionetteError::UnknownJoint(mimic.joint.clone()))?;
            positions[index.0] = follower.clamp_position(mimic.calculate_position(positions[leader.0]));
        }
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Frame;
    use crate::joint::{Axis, Joint, JointKind, Limit, Mimic};
    use crate::link::Link;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn model() -> Marionette {
        let links = ["base", "upper", "lower", "tool"].map(Link::new).to_vec();
        let joints = vec![
            Joint::new("shoulder", JointKind::Revolute, "base", "upper")
                .with_axis(Axis::new([0.0, 0.0, 1.0]))
                .with_limit(Limit::bounds(-1.0, 1.0)),
            Joint::new("elbow", JointKind::Revolute, "upper", "lower")
                .with_origin(Frame::from_xyz_rpy([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]))
                .with_axis(Axis::new([0.0, 0.0, 1.0]))
                .with_limit(Limit::bounds(-2.0, 2.0))
                .with_mimic(Mimic::with_params("shoulder", 2.0, 0.0)),
            Joint::new("slide", JointKind::Prismatic, "lower", "tool")
                .with_origin(Frame::from_xyz_rpy([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]))
                .with_limit(Limit::bounds(0.0, 0.5)),
        ];
        Marionette::new("arm", links, joints).unwrap()
    }

    #[test]
    fn test_resolve_positions() {
        let model = model();
        let state = JointState::from([("shoulder".to_string(), 1.5), ("slide".to_string(), 0.25)]);
        // root, shoulder (clamped), elbow (mimic of the clamped leader, clamped again), slide
        assert_eq!(model.resolve_positions(&state).unwrap(), [0.0, 1.0, 2.0, 0.25]);

        let state = JointState::from([("elbow".to_string(), 0.0)]);
        assert_eq!(
            model.resolve_positions(&state).unwrap_err(),
            MarionetteError::NotConfigurable("elbow".to_string())
        );
    }

    #[test_log::test]
    fn test_forward_kinematics_leaves_model_unchanged() {
        let model = model();
        let state = JointState::from([("shoulder".to_string(), std::f64::consts::FRAC_PI_4)]);
        let result = model.forward_kinematics(&state, &Isometry3::identity()).unwrap();

        assert_eq!(result.len(), 4);
        assert_relative_eq!(result["base"], Isometry3::identity(), epsilon = 1e-12);
        // shoulder at 45°, elbow mimics at 90°: lower link sits at (cos 45°, sin 45°, 0)
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(
            result["lower"].translation.vector,
            Vector3::new(half, half, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result["tool"].rotation.angle(),
            3.0 * std::f64::consts::FRAC_PI_4,
            epsilon = 1e-12
        );
        assert_eq!(model.joint("shoulder").unwrap().position(), 0.0);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_forward_kinematics() {
        let model = model();
        let states = (0..8)
            .map(|i| JointState::from([("shoulder".to_string(), 0.1 * i as f64)]))
            .collect_vec();
        let results = par_forward_kinematics(&model, &states, &Isometry3::identity());
        for (state, result) in states.iter().zip(results) {
            let expected = model.forward_kinematics(state, &Isometry3::identity()).unwrap();
            assert_eq!(result.unwrap(), expected);
        }
    }
}
