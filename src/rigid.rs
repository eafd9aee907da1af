/*! Defines the payload carried by [Nodelike] in the context of kinematics */

use crate::arena::Nodelike;
use crate::MarionetteError;

/// A rigid body connected to its parent by a joint.
///
/// Wraps the transformation algebra such that tree algorithms only need this trait.
pub trait Rigid {
    /// E.g., an isometry or a 4x4 matrix
    type Transformation: Clone;
    /// Typically the joint position (angle/extension)
    type Parameter;

    /// Get the transformation from the parent taking the connecting joint into account
    fn transformation(&self, param: &Self::Parameter) -> Result<Self::Transformation, MarionetteError>;

    /// Returns the neutral element wrt. the transformation convention used
    fn neutral_element() -> Self::Transformation;

    /// Concat two transformations
    fn concat(first: &Self::Transformation, second: &Self::Transformation) -> Self::Transformation;
}

/// Trait that adds an `accumulate_transformations` function for accumulating transformations
/// along the direct path from the root to each node.
///
/// Implemented for any iterator over nodes but only meaningful on a depth-first iteration
/// (not enforced!). Each node receives the accumulated transformation of its parent; the
/// root receives `first`.
pub trait TransformationAccumulation<'a, Node, Load, NodeId>
where
    Load: Rigid,
    Node: Nodelike<Load, NodeId> + 'a,
{
    fn accumulate_transformations(
        self,
        params: &'a [Load::Parameter],
        first: Load::Transformation,
        max_depth: usize,
    ) -> impl Iterator<Item = Result<(&'a Node, Load::Transformation), MarionetteError>>;
}

impl<'a, Node, Load, NodeId, T> TransformationAccumulation<'a, Node, Load, NodeId> for T
where
    Load: Rigid + 'a,
    Node: Nodelike<Load, NodeId> + 'a,
    T: Iterator<Item = &'a Node>,
{
    fn accumulate_transformations(
        self,
        params: &'a [Load::Parameter],
        first: Load::Transformation,
        max_depth: usize,
    ) -> impl Iterator<Item = Result<(&'a Node, Load::Transformation), MarionetteError>> {
        self.zip(params.iter()).scan(
            Vec::<Load::Transformation>::with_capacity(max_depth),
            move |stack, (node, param)| {
                stack.truncate(node.depth());
                let local = match node.get().transformation(param) {
                    Ok(local) => local,
                    Err(error) => return Some(Err(error)),
                };
                let current = Load::concat(stack.last().unwrap_or(&first), &local);
                stack.push(current.clone());
                Some(Ok((node, current)))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{DepthFirstArenaTree, DirectedArenaTree, DirectionIterable, OptimizedDirectionIterable};
    use itertools::Itertools;

    /// Transformations are offsets along a line, the parameter a gain.
    #[derive(Debug)]
    struct Offset(f64);

    impl Rigid for Offset {
        type Transformation = f64;

        type Parameter = f64;

        fn transformation(&self, param: &Self::Parameter) -> Result<Self::Transformation, MarionetteError> {
            if param.is_nan() {
                return Err(MarionetteError::UnknownJoint("nan".to_string()));
            }
            Ok(self.0 * param)
        }

        fn neutral_element() -> Self::Transformation {
            0.0
        }

        fn concat(first: &Self::Transformation, second: &Self::Transformation) -> Self::Transformation {
            first + second
        }
    }

    //     root(1)
    //    /       \
    //  a(10)     c(1000)
    //   |
    //  b(100)
    fn tree() -> DepthFirstArenaTree<Offset, &'static str> {
        let mut tree = DirectedArenaTree::new();
        let root = tree.set_root(Offset(1.0), "root");
        let a = tree.add(Offset(10.0), "a", &root).unwrap();
        tree.add(Offset(1000.0), "c", &root).unwrap();
        tree.add(Offset(100.0), "b", &a).unwrap();
        tree.into()
    }

    #[test]
    fn test_accumulation() {
        let tree = tree();
        let result = tree
            .iter()
            .accumulate_transformations(&[1.0, 1.0, 1.0, 1.0], 0.5, 4)
            .map_ok(|(node, value)| (node.id(), value))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(
            result,
            vec![("root", 1.5), ("a", 11.5), ("b", 111.5), ("c", 1001.5)]
        );
    }

    #[test]
    fn test_accumulation_error() {
        let tree = tree();
        let result = tree
            .iter()
            .accumulate_transformations(&[1.0, f64::NAN, 1.0, 1.0], 0.0, 4)
            .collect::<Result<Vec<_>, _>>();
        assert!(result.is_err());
    }
}
