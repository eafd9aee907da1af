use approx::assert_relative_eq;
use marionette::{Axis, Forward, Frame, Joint, JointKind, JointState, Limit, Link, Marionette, MarionetteError, Mimic};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

fn links(names: &[&str]) -> Vec<Link> {
    names.iter().map(|name| Link::new(*name)).collect()
}

fn state(positions: &[(&str, f64)]) -> JointState {
    positions.iter().map(|(name, position)| (name.to_string(), *position)).collect()
}

/// Three revolute joints and a prismatic joint with offsets in every direction, plus a fixed
/// sensor mount branching off the base.
fn arm() -> Marionette {
    let joints = vec![
        Joint::new("waist", JointKind::Revolute, "base", "torso")
            .with_origin(Frame::from_xyz_rpy([0.0, 0.0, 0.3], [0.0, 0.0, 0.0]))
            .with_axis(Axis::new([0.0, 0.0, 1.0]))
            .with_limit(Limit::bounds(-3.0, 3.0)),
        Joint::new("shoulder", JointKind::Revolute, "torso", "upper")
            .with_origin(Frame::from_xyz_rpy([0.1, 0.0, 0.5], [0.0, 0.2, 0.0]))
            .with_axis(Axis::new([0.0, 1.0, 0.0]))
            .with_limit(Limit::bounds(-2.0, 2.0)),
        Joint::new("elbow", JointKind::Continuous, "upper", "lower")
            .with_origin(Frame::from_xyz_rpy([0.0, 0.1, 0.8], [0.3, 0.0, 0.1]))
            .with_axis(Axis::new([0.0, 1.0, 1.0])),
        Joint::new("extension", JointKind::Prismatic, "lower", "tool")
            .with_origin(Frame::from_xyz_rpy([0.7, 0.0, 0.0], [0.0, 0.0, 0.0]))
            .with_axis(Axis::new([1.0, 0.0, 0.0]))
            .with_limit(Limit::bounds(0.0, 0.4)),
        Joint::new("sensor_mount", JointKind::Fixed, "base", "sensor")
            .with_origin(Frame::from_xyz_rpy([-0.2, 0.0, 0.1], [0.0, 0.0, FRAC_PI_2])),
    ];
    Marionette::new(
        "arm",
        links(&["base", "torso", "upper", "lower", "tool", "sensor"]),
        joints,
    )
    .unwrap()
}

fn arm_state() -> JointState {
    state(&[("waist", 0.4), ("shoulder", -0.7), ("elbow", 1.3), ("extension", 0.25)])
}

#[test_log::test]
fn test_revolute_position_is_clamped() {
    let links = links(&["base", "arm"]);
    let joints = vec![Joint::new("hinge", JointKind::Revolute, "base", "arm")
        .with_axis(Axis::new([0.0, 0.0, 1.0]))
        .with_limit(Limit::bounds(-1.0, 1.0))];
    let mut model = Marionette::new("hinge", links, joints).unwrap();

    model.set_position("hinge", 2.0).unwrap();
    model.propagate(&Isometry3::identity()).unwrap();

    assert_eq!(model.joint("hinge").unwrap().position(), 1.0);
    let arm = model.link_transformation("arm").unwrap();
    assert_relative_eq!(arm.rotation.angle(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(
        arm.rotation.axis().unwrap().into_inner(),
        Vector3::z(),
        epsilon = 1e-12
    );
}

#[test_log::test]
fn test_mimic_follows_leader() {
    let links = links(&["base", "a", "b"]);
    let joints = vec![
        Joint::new("A", JointKind::Continuous, "base", "a").with_axis(Axis::new([0.0, 0.0, 1.0])),
        Joint::new("B", JointKind::Continuous, "a", "b")
            .with_axis(Axis::new([0.0, 0.0, 1.0]))
            .with_mimic(Mimic::with_params("A", 2.0, 0.1)),
    ];
    let mut model = Marionette::new("mimic", links, joints).unwrap();

    model.update(&state(&[("A", 0.5)]), &Isometry3::identity()).unwrap();

    assert_relative_eq!(model.joint("B").unwrap().position(), 1.1, epsilon = 1e-12);
    let b = model.link_transformation("b").unwrap();
    assert_relative_eq!(b.rotation.angle(), 1.6, epsilon = 1e-12);
}

#[test_log::test]
fn test_mimic_chain_resolves_transitively() {
    // C follows B which follows A; followers are declared before their leaders
    let links = links(&["base", "a", "b", "c"]);
    let joints = vec![
        Joint::new("C", JointKind::Continuous, "b", "c")
            .with_axis(Axis::new([0.0, 0.0, 1.0]))
            .with_mimic(Mimic::with_params("B", -1.0, 0.0)),
        Joint::new("B", JointKind::Continuous, "a", "b")
            .with_axis(Axis::new([0.0, 0.0, 1.0]))
            .with_mimic(Mimic::with_params("A", 2.0, 0.1)),
        Joint::new("A", JointKind::Continuous, "base", "a").with_axis(Axis::new([0.0, 0.0, 1.0])),
    ];
    let mut model = Marionette::new("chain", links, joints).unwrap();

    let pure = model.forward_kinematics(&state(&[("A", 0.5)]), &Isometry3::identity()).unwrap();
    model.update(&state(&[("A", 0.5)]), &Isometry3::identity()).unwrap();

    assert_relative_eq!(model.joint("B").unwrap().position(), 1.1, epsilon = 1e-12);
    assert_relative_eq!(model.joint("C").unwrap().position(), -1.1, epsilon = 1e-12);

    // accumulated rotations about z: 0.5, 0.5 + 1.1, 0.5 + 1.1 - 1.1
    for (link, yaw) in [("a", 0.5), ("b", 1.6), ("c", 0.5)] {
        let transformation = model.link_transformation(link).unwrap();
        assert_relative_eq!(transformation.rotation.euler_angles().2, yaw, epsilon = 1e-12);
        assert_relative_eq!(
            transformation.to_homogeneous(),
            pure[link].to_homogeneous(),
            epsilon = 1e-12
        );
    }

    // followers pick up a new leader position on the next propagation
    model.set_position("A", -0.25).unwrap();
    model.propagate(&Isometry3::identity()).unwrap();
    assert_relative_eq!(model.joint("B").unwrap().position(), -0.4, epsilon = 1e-12);
    assert_relative_eq!(model.joint("C").unwrap().position(), 0.4, epsilon = 1e-12);
}

#[test_log::test]
fn test_prismatic_chain_moves_fixed_joint() {
    let links = links(&["root", "slider", "mount"]);
    let joints = vec![
        Joint::new("J1", JointKind::Prismatic, "root", "slider")
            .with_axis(Axis::new([1.0, 0.0, 0.0]))
            .with_limit(Limit::bounds(0.0, 2.0)),
        Joint::new("J2", JointKind::Fixed, "slider", "mount")
            .with_origin(Frame::from_xyz_rpy([0.0, 0.0, 0.5], [0.0, 0.0, 0.0])),
    ];
    let mut model = Marionette::new("chain", links, joints).unwrap();

    model.update(&state(&[("J1", 1.0)]), &Isometry3::identity()).unwrap();

    let j2 = model.joint("J2").unwrap();
    assert_relative_eq!(*j2.current_origin().point(), Point3::new(1.0, 0.0, 0.5), epsilon = 1e-12);
    assert_relative_eq!(
        *model.link_frame("mount").unwrap().point(),
        Point3::new(1.0, 0.0, 0.5),
        epsilon = 1e-12
    );
}

#[test_log::test]
fn test_propagation_composes_with_root_transformations() {
    let t1 = Isometry3::from_parts(
        Translation3::new(0.5, -1.0, 2.0),
        UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
    );
    let t2 = Isometry3::from_parts(
        Translation3::new(-3.0, 0.25, 1.0),
        UnitQuaternion::from_euler_angles(-0.4, 0.7, 1.1),
    );

    let mut composed = arm();
    composed.update(&arm_state(), &(t2 * t1)).unwrap();

    let mut sequential = arm();
    sequential.update(&arm_state(), &t1).unwrap();
    sequential.transform(&t2);

    for (expected, actual) in composed.joints().zip(sequential.joints()) {
        assert_eq!(expected.name(), actual.name());
        assert_relative_eq!(
            expected.current_transformation().to_homogeneous(),
            actual.current_transformation().to_homogeneous(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            *expected.current_axis().vector(),
            *actual.current_axis().vector(),
            epsilon = 1e-9
        );
    }
    for link in composed.links() {
        assert_relative_eq!(
            composed.link_transformation(&link.name).unwrap().to_homogeneous(),
            sequential.link_transformation(&link.name).unwrap().to_homogeneous(),
            epsilon = 1e-9
        );
    }
}

#[test_log::test]
fn test_propagation_matches_forward_kinematics() {
    let root = Isometry3::from_parts(
        Translation3::new(1.0, 2.0, 3.0),
        UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5),
    );
    let mut model = arm();
    let expected = model.forward_kinematics(&arm_state(), &root).unwrap();
    model.update(&arm_state(), &root).unwrap();

    assert_eq!(expected.len(), 6);
    for (link, transformation) in expected {
        assert_relative_eq!(
            model.link_transformation(&link).unwrap().to_homogeneous(),
            transformation.to_homogeneous(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_scale_is_inverted_by_reciprocal() {
    let mut model = arm();
    model.update(&arm_state(), &Isometry3::identity()).unwrap();
    let origins = model.joints().map(|joint| *joint.current_origin().point()).collect::<Vec<_>>();
    let limit = model.joint("extension").unwrap().limit().unwrap().clone();

    model.scale(2.5);
    assert_relative_eq!(model.joint("extension").unwrap().limit().unwrap().upper, 1.0, epsilon = 1e-12);
    // revolute limits are angles and stay untouched
    assert_eq!(model.joint("waist").unwrap().limit().unwrap().upper, 3.0);

    model.scale(0.4);
    for (joint, origin) in model.joints().zip(origins) {
        assert_relative_eq!(*joint.current_origin().point(), origin, epsilon = 1e-12);
    }
    let restored = model.joint("extension").unwrap().limit().unwrap();
    assert_relative_eq!(restored.lower, limit.lower, epsilon = 1e-12);
    assert_relative_eq!(restored.upper, limit.upper, epsilon = 1e-12);
}

#[test]
fn test_scaled_model_propagates_scaled_origins() {
    let mut model = arm();
    model.update(&arm_state(), &Isometry3::identity()).unwrap();
    let before = model.link_transformation("tool").unwrap();

    model.scale(2.0);
    model.propagate(&Isometry3::identity()).unwrap();
    let after = model.link_transformation("tool").unwrap();

    // the prismatic limit doubles as well, but the position is re-clamped only when set
    assert_relative_eq!(after.rotation, before.rotation, epsilon = 1e-12);
    assert!((after.translation.vector - before.translation.vector).norm() > 0.1);
}

#[test]
fn test_unsupported_joints_fail_propagation() {
    let links = links(&["base", "body"]);
    let joints = vec![Joint::new("free", JointKind::Floating, "base", "body")];
    let mut model = Marionette::new("floating", links, joints).unwrap();

    let error = model.propagate(&Isometry3::identity()).unwrap_err();
    assert_eq!(
        error,
        MarionetteError::NotImplemented {
            joint: "free".to_string(),
            kind: JointKind::Floating
        }
    );
    assert!(model.forward_kinematics(&JointState::new(), &Isometry3::identity()).is_err());
}

#[test]
fn test_missing_limit_fails_propagation() {
    let links = links(&["base", "body"]);
    let joints = vec![Joint::new("hinge", JointKind::Revolute, "base", "body")];
    let mut model = Marionette::new("unlimited", links, joints).unwrap();

    assert_eq!(
        model.propagate(&Isometry3::identity()).unwrap_err(),
        MarionetteError::MissingLimit {
            joint: "hinge".to_string(),
            kind: JointKind::Revolute
        }
    );
}

#[test]
fn test_unknown_joint_in_state() {
    let mut model = arm();
    let error = model
        .update(&state(&[("waist", 0.1), ("knee", 0.2)]), &Isometry3::identity())
        .unwrap_err();
    assert_eq!(error, MarionetteError::UnknownJoint("knee".to_string()));
    assert_eq!(model.joint("waist").unwrap().position(), 0.0);
    assert_eq!(error.to_string(), "Unknown joint: knee");
}

#[test]
fn test_positions_and_zero_configuration() {
    let mut model = arm();
    model.set_configuration(&arm_state()).unwrap();

    let positions = model.positions();
    assert_eq!(positions.len(), 5);
    assert_eq!(positions["extension"], 0.25);
    assert_eq!(positions["sensor_mount"], 0.0);

    model.update(&model.zero_configuration(), &Isometry3::identity()).unwrap();
    assert!(model.positions().values().all(|position| *position == 0.0));
}
