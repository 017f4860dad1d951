//! Single decision tree stored as a node arena.

use crate::error::BoundsError;
use crate::forest::node::Node;

/// Binary decision tree.
///
/// Built once from a description and immutable afterwards. Construction
/// guarantees every child index is in the arena and that the nodes
/// reachable from the root form a tree, so traversal always ends at a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl DecisionTree {
    /// Wrap an arena whose structure was already validated.
    pub(crate) fn from_validated(nodes: Vec<Node>, root: usize) -> Self {
        Self { nodes, root }
    }

    /// Walk from the root to a leaf and return its prediction.
    pub fn predict(&self, features: &[f32]) -> Result<usize, BoundsError> {
        let mut current = self.root;
        loop {
            match self.nodes[current] {
                Node::Leaf { prediction } => return Ok(prediction),
                Node::Internal {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *features.get(feature_index).ok_or(BoundsError::FeatureIndex {
                        index: feature_index,
                        len: features.len(),
                    })?;
                    current = if value <= threshold { left } else { right };
                }
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes in the arena, including any unreachable from the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // x0 <= 0.5 ? (x1 <= 0.2 ? 0 : 1) : 2
    fn sample_tree() -> DecisionTree {
        DecisionTree::from_validated(
            vec![
                Node::Internal {
                    feature_index: 0,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                Node::Internal {
                    feature_index: 1,
                    threshold: 0.2,
                    left: 3,
                    right: 4,
                },
                Node::Leaf { prediction: 2 },
                Node::Leaf { prediction: 0 },
                Node::Leaf { prediction: 1 },
            ],
            0,
        )
    }

    #[test]
    fn test_predict_paths() {
        let tree = sample_tree();
        assert_eq!(tree.predict(&[0.1, 0.1]), Ok(0));
        assert_eq!(tree.predict(&[0.1, 0.9]), Ok(1));
        assert_eq!(tree.predict(&[0.9, 0.0]), Ok(2));
    }

    #[test]
    fn test_threshold_equality_goes_left() {
        let tree = sample_tree();
        assert_eq!(tree.predict(&[0.5, 0.2]), Ok(0));
    }

    #[test]
    fn test_feature_index_out_of_range() {
        let tree = sample_tree();
        assert_eq!(
            tree.predict(&[0.1]),
            Err(BoundsError::FeatureIndex { index: 1, len: 1 })
        );
        // The right branch never reads feature 1.
        assert_eq!(tree.predict(&[0.9]), Ok(2));
    }

    #[test]
    fn test_depth_and_count() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 5);
        assert!(!tree.root().is_leaf());

        let single = DecisionTree::from_validated(vec![Node::Leaf { prediction: 4 }], 0);
        assert_eq!(single.depth(), 0);
        assert_eq!(single.predict(&[]), Ok(4));
    }
}
