/*! The kinematic model of a mechanism: a tree of [links](Link) connected by [joints](Joint).
 *
 * [Marionette] owns the tree, validates its structure once on construction and keeps the
 * world-relative geometry of every joint and link in sync with the joint positions.
 */

use crate::arena::{
    ArenaIndex, BaseDirectionIterable, DepthFirstArenaTree, DirectedArenaTree, DirectionIterable, Nodelike,
    OptimizedDirectionIterable,
};
use crate::geometry::Frame;
use crate::joint::Joint;
use crate::link::{Link, LinkNode};
use crate::MarionetteError;
use core::fmt;
use itertools::Itertools;
use nalgebra::Isometry3;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};
use tracing_attributes::instrument;

/// Joint positions by joint name
pub type JointState = HashMap<String, f64>;

pub(crate) type LinkTree = DepthFirstArenaTree<LinkNode, String>;

/// Forward kinematics model of an articulated mechanism.
///
/// The nodes of the tree are links, its edges the joints; every link except the root has
/// exactly one incoming joint. Joints are identified by name, and mimic relations are
/// resolved through a name lookup.
///
/// ```
/// use marionette::{Axis, Joint, JointKind, Limit, Link, Marionette};
/// use nalgebra::Isometry3;
///
/// let links = vec![Link::new("base"), Link::new("arm")];
/// let joints = vec![Joint::new("shoulder", JointKind::Revolute, "base", "arm")
///     .with_axis(Axis::new([0.0, 0.0, 1.0]))
///     .with_limit(Limit::bounds(-1.0, 1.0))];
/// let mut model = Marionette::new("robot", links, joints).unwrap();
///
/// model.set_position("shoulder", 0.5).unwrap();
/// model.propagate(&Isometry3::identity()).unwrap();
/// let arm = model.link_transformation("arm").unwrap();
/// assert!((arm.rotation.angle() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct Marionette {
    name: String,
    pub(crate) tree: LinkTree,
    /// Arena index of the node each joint leads to
    pub(crate) joint_lookup: HashMap<String, ArenaIndex>,
    /// Joints with a mimic, ordered such that every joint comes after the joint it mimics
    pub(crate) mimic_order: Vec<ArenaIndex>,
}

impl Marionette {
    /// Builds the model from its links and joints.
    ///
    /// The graph has to be a tree: unique link and joint names, joints referencing existing
    /// links, a single root link and no cycles. Mimic relations have to reference existing
    /// joints and must not form a cycle. The joints are placed for the identity root
    /// transformation, without applying their positions.
    #[instrument(skip_all, err)]
    pub fn new(name: impl Into<String>, links: Vec<Link>, joints: Vec<Joint>) -> Result<Self, MarionetteError> {
        let name = name.into();

        let mut link_names = HashSet::with_capacity(links.len());
        if let Some(duplicate) = links.iter().find(|link| !link_names.insert(link.name.as_str())) {
            return Err(MarionetteError::NotUnique(duplicate.name.clone()));
        }
        let mut joint_names = HashSet::with_capacity(joints.len());
        if let Some(duplicate) = joints.iter().find(|joint| !joint_names.insert(joint.name())) {
            return Err(MarionetteError::NotUnique(duplicate.name().to_string()));
        }

        // parent link -> outgoing joints (in order of declaration), child link -> incoming joint
        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<&str, usize> = HashMap::new();
        for (index, joint) in joints.iter().enumerate() {
            for link in [joint.parent(), joint.child()] {
                if !link_names.contains(link) {
                    return Err(MarionetteError::UnknownLink(link.to_string()));
                }
            }
            if incoming.insert(joint.child(), index).is_some() {
                return Err(MarionetteError::MultipleParents(joint.child().to_string()));
            }
            outgoing.entry(joint.parent().to_string()).or_default().push(index);
        }

        let roots = links
            .iter()
            .filter(|link| !incoming.contains_key(link.name.as_str()))
            .map(|link| link.name.clone())
            .collect_vec();
        let root = match roots.as_slice() {
            [] => return Err(MarionetteError::RootNotSet),
            [root] => root.clone(),
            _ => return Err(MarionetteError::MultipleRoots(roots)),
        };

        let joint_count = joints.len();
        let mut joints = joints.into_iter().map(Some).collect_vec();
        let mut links: HashMap<String, Link> = links.into_iter().map(|link| (link.name.clone(), link)).collect();

        let mut tree = DirectedArenaTree::with_capacity(links.len());
        let root_link = links.remove(&root).ok_or_else(|| MarionetteError::UnknownLink(root.clone()))?;
        tree.set_root(LinkNode::new(root_link, None), root.clone());

        let mut queue = VecDeque::from([root]);
        while let Some(parent) = queue.pop_front() {
            for &index in outgoing.get(&parent).into_iter().flatten() {
                let Some(joint) = joints.get_mut(index).and_then(Option::take) else {
                    continue;
                };
                let child = joint.child().to_string();
                let link = links.remove(&child).ok_or_else(|| MarionetteError::UnknownLink(child.clone()))?;
                tree.add(LinkNode::new(link, Some(joint)), child.clone(), &parent)?;
                queue.push_back(child);
            }
        }

        if !links.is_empty() {
            return Err(MarionetteError::Unreachable(links.into_keys().sorted().collect()));
        }

        let tree: LinkTree = tree.into();
        let joint_lookup = tree
            .iter()
            .filter_map(|node| node.get().joint().map(|joint| (joint.name().to_string(), node.index())))
            .collect::<HashMap<_, _>>();
        let mimic_order = mimic_order(&tree, &joint_lookup)?;

        debug!(
            model = %name,
            links = tree.len(),
            joints = joint_count,
            mimics = mimic_order.len(),
            "built kinematic tree"
        );

        let mut model = Marionette {
            name,
            tree,
            joint_lookup,
            mimic_order,
        };
        model.create(&Isometry3::identity());
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the position of a configurable joint. Positions outside the limits of revolute
    /// and prismatic joints are clamped.
    pub fn set_position(&mut self, joint: &str, position: f64) -> Result<(), MarionetteError> {
        let index = self.configurable_index(joint)?;
        let joint = joint_at_mut(&mut self.tree, index)?;
        joint.set_position(position);
        if joint.position() != position {
            trace!(joint = joint.name(), requested = position, clamped = joint.position(), "clamped position");
        }
        Ok(())
    }

    /// Sets the positions of all joints in `state`. Either all positions are set or, if
    /// `state` names an unknown or non-configurable joint, none.
    pub fn set_configuration(&mut self, state: &JointState) -> Result<(), MarionetteError> {
        let indices = state
            .iter()
            .map(|(name, position)| Ok((self.configurable_index(name)?, *position)))
            .collect::<Result<Vec<_>, MarionetteError>>()?;
        for (index, position) in indices {
            joint_at_mut(&mut self.tree, index)?.set_position(position);
        }
        Ok(())
    }

    /// Recomputes the current origin and axis of every joint and the world transformation of
    /// every link from the joint positions, with the root link placed at `root`.
    ///
    /// Mimicking joints take their positions from the joints they follow first. A failing
    /// joint aborts the update; joints visited before it keep their new geometry.
    #[instrument(skip(self), fields(model = %self.name), err)]
    pub fn propagate(&mut self, root: &Isometry3<f64>) -> Result<(), MarionetteError> {
        self.resolve_mimics()?;

        let mut stack = Vec::<Isometry3<f64>>::with_capacity(self.tree.max_depth());
        for node in self.tree.iter_mut() {
            stack.truncate(node.depth());
            let parent = stack.last().copied().unwrap_or(*root);
            let body = node.get_mut();
            let world = match body.joint_mut() {
                Some(joint) => {
                    joint.place(&parent);
                    let motion = joint.calculate_transformation(joint.position())?;
                    trace!(joint = joint.name(), position = joint.position(), "propagated joint");
                    motion * joint.current_transformation()
                }
                None => parent,
            };
            body.set_world_transformation(world);
            stack.push(world);
        }
        Ok(())
    }

    /// Sets the positions in `state` and propagates them.
    pub fn update(&mut self, state: &JointState, root: &Isometry3<f64>) -> Result<(), MarionetteError> {
        self.set_configuration(state)?;
        self.propagate(root)
    }

    /// Applies `transformation` to the current geometry of all joints and links, as if the
    /// whole mechanism was moved.
    pub fn transform(&mut self, transformation: &Isometry3<f64>) {
        self.tree
            .iter_mut()
            .for_each(|node| node.get_mut().transform(transformation));
    }

    /// Scales the mechanism by `factor`: the joint origins, the world translations of the
    /// links and the limits of prismatic and planar joints.
    #[instrument(skip(self), fields(model = %self.name))]
    pub fn scale(&mut self, factor: f64) {
        debug!("scaling mechanism");
        self.tree.iter_mut().for_each(|node| node.get_mut().scale(factor));
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        let index = self.joint_lookup.get(name)?;
        self.tree.get(*index)?.get().joint()
    }

    /// All joints in depth-first order
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.tree.iter().filter_map(|node| node.get().joint())
    }

    pub fn joint_names(&self) -> Vec<&str> {
        self.joints().map(Joint::name).collect()
    }

    pub fn configurable_joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints().filter(|joint| joint.is_configurable())
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.tree.node_by_id(&name.to_string()).map(|node| node.get().link())
    }

    /// All links in depth-first order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.tree.iter().map(|node| node.get().link())
    }

    pub fn root_link(&self) -> &Link {
        self.tree.nodes()[0].get().link()
    }

    /// Links without child joints
    pub fn end_links(&self) -> impl Iterator<Item = &Link> {
        self.tree
            .iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.get().link())
    }

    /// The joint connecting `link` to its parent link (`None` for the root link)
    pub fn parent_joint(&self, link: &str) -> Option<&Joint> {
        self.tree.node_by_id(&link.to_string())?.get().joint()
    }

    /// The joints connecting `link` to its child links, in order of declaration
    pub fn child_joints(&self, link: &str) -> Result<Vec<&Joint>, MarionetteError> {
        let node = self
            .tree
            .node_by_id(&link.to_string())
            .ok_or_else(|| MarionetteError::UnknownLink(link.to_string()))?;
        Ok(self
            .tree
            .children(node)?
            .into_iter()
            .filter_map(|child| child.get().joint())
            .collect())
    }

    /// World transformation of a link as of the last propagation
    pub fn link_transformation(&self, link: &str) -> Option<Isometry3<f64>> {
        self.tree
            .node_by_id(&link.to_string())
            .map(|node| *node.get().world_transformation())
    }

    /// World frame of a link as of the last propagation
    pub fn link_frame(&self, link: &str) -> Option<Frame> {
        self.tree.node_by_id(&link.to_string()).map(|node| node.get().frame())
    }

    /// Positions of all joints
    pub fn positions(&self) -> JointState {
        self.joints()
            .map(|joint| (joint.name().to_string(), joint.position()))
            .collect()
    }

    /// Zero positions for all configurable joints
    pub fn zero_configuration(&self) -> JointState {
        self.configurable_joints()
            .map(|joint| (joint.name().to_string(), 0.0))
            .collect()
    }

    /// Arena index of a joint that may be configured directly.
    pub(crate) fn configurable_index(&self, name: &str) -> Result<ArenaIndex, MarionetteError> {
        let index = *self
            .joint_lookup
            .get(name)
            .ok_or_else(|| MarionetteError::UnknownJoint(name.to_string()))?;
        if joint_at(&self.tree, index)?.is_configurable() {
            Ok(index)
        } else {
            Err(MarionetteError::NotConfigurable(name.to_string()))
        }
    }

    /// Places all joints without applying their positions.
    fn create(&mut self, root: &Isometry3<f64>) {
        let mut stack = Vec::<Isometry3<f64>>::with_capacity(self.tree.max_depth());
        for node in self.tree.iter_mut() {
            stack.truncate(node.depth());
            let parent = stack.last().copied().unwrap_or(*root);
            let body = node.get_mut();
            let world = match body.joint_mut() {
                Some(joint) => {
                    joint.place(&parent);
                    joint.current_transformation()
                }
                None => parent,
            };
            body.set_world_transformation(world);
            stack.push(world);
        }
    }

    /// Writes the positions of all mimicking joints, leaders first.
    fn resolve_mimics(&mut self) -> Result<(), MarionetteError> {
        for &index in &self.mimic_order {
            let follower = joint_at(&self.tree, index)?;
            let Some(mimic) = follower.mimic() else {
                continue;
            };
            let leader = self
                .joint_lookup
                .get(&mimic.joint)
                .ok_or_else(|| MarionetteError::UnknownJoint(mimic.joint.clone()))?;
            let position = mimic.calculate_position(joint_at(&self.tree, *leader)?.position());
            joint_at_mut(&mut self.tree, index)?.set_position(position);
        }
        Ok(())
    }
}

impl fmt::Display for Marionette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Marionette `{}`", self.name)?;
        for node in self.tree.iter() {
            writeln!(f, "{}{}", "  ".repeat(node.depth()), node.get())?;
        }
        Ok(())
    }
}

pub(crate) fn joint_at(tree: &LinkTree, index: ArenaIndex) -> Result<&Joint, MarionetteError> {
    tree.get(index)
        .and_then(|node| node.get().joint())
        .ok_or(MarionetteError::ReferenceOutOfBound(index.0))
}

fn joint_at_mut(tree: &mut LinkTree, index: ArenaIndex) -> Result<&mut Joint, MarionetteError> {
    tree.get_mut(index)
        .and_then(|node| node.get_mut().joint_mut())
        .ok_or(MarionetteError::ReferenceOutOfBound(index.0))
}

/// Orders the mimicking joints such that each comes after the joint it follows. Fails on
/// references to unknown joints and on cycles.
fn mimic_order(
    tree: &LinkTree,
    joint_lookup: &HashMap<String, ArenaIndex>,
) -> Result<Vec<ArenaIndex>, MarionetteError> {
    let mut order = Vec::new();
    let mut done = HashSet::new();

    for node in tree.iter() {
        // walk the chain of leaders until a resolved joint or a joint without mimic
        let mut chain = Vec::<ArenaIndex>::new();
        let mut current = node.index();
        while !done.contains(&current) {
            if let Some(start) = chain.iter().position(|index| *index == current) {
                let cycle = chain[start..]
                    .iter()
                    .chain([&current])
                    .map(|index| joint_at(tree, *index).map(|joint| joint.name().to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                return Err(MarionetteError::MimicCycle(cycle));
            }
            chain.push(current);
            match tree.get(current).and_then(|node| node.get().joint()).and_then(Joint::mimic) {
                Some(mimic) => {
                    current = *joint_lookup
                        .get(&mimic.joint)
                        .ok_or_else(|| MarionetteError::UnknownJoint(mimic.joint.clone()))?;
                }
                None => break,
            }
        }

        // leaders first
        for index in chain.into_iter().rev() {
            if joint_at(tree, index).is_ok_and(|joint| joint.mimic().is_some()) {
                order.push(index);
            }
            done.insert(index);
        }
    }
    Ok(order)
}
