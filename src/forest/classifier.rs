//! Random-forest majority vote.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{BoundsError, StructuralError};
use crate::forest::description::{ForestDescription, NodeRecord, build_tree};
use crate::forest::node::Node;
use crate::forest::tree::DecisionTree;

/// Ensemble of decision trees combined by majority vote.
///
/// Immutable once built, so a single instance can be shared behind an `Arc`
/// and queried from any number of threads without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    num_classes: usize,
}

impl ForestClassifier {
    /// Wrap prebuilt trees.
    ///
    /// Leaf predictions are not checked here; an out-of-range vote surfaces
    /// from [`predict`](Self::predict). Use [`from_description`](Self::from_description)
    /// to validate at load time.
    pub fn new(trees: Vec<DecisionTree>, num_classes: usize) -> Self {
        Self { trees, num_classes }
    }

    /// Build every tree and check each leaf against `num_classes`.
    pub fn from_description(description: &ForestDescription) -> Result<Self, StructuralError> {
        Self::from_records(&description.trees, description.num_classes)
    }

    /// Build from per-tree record lists with an externally known class count.
    pub fn from_records(
        trees: &[Vec<NodeRecord>],
        num_classes: usize,
    ) -> Result<Self, StructuralError> {
        let trees = trees
            .iter()
            .enumerate()
            .map(|(tree, records)| {
                let built = build_tree(tree, records)?;
                check_leaf_classes(tree, &built, records, num_classes)?;
                Ok(built)
            })
            .collect::<Result<Vec<_>, StructuralError>>()?;

        debug!(
            trees = trees.len(),
            nodes = trees.iter().map(DecisionTree::node_count).sum::<usize>(),
            num_classes,
            "built forest"
        );
        Ok(Self { trees, num_classes })
    }

    /// Parse a `{"num_classes": .., "trees": [[..], ..]}` document.
    pub fn from_json_str(json: &str) -> Result<Self, StructuralError> {
        let description: ForestDescription = serde_json::from_str(json)?;
        Self::from_description(&description)
    }

    /// Parse a bare array of trees, each an array of node records.
    pub fn from_trees_json(json: &str, num_classes: usize) -> Result<Self, StructuralError> {
        let trees: Vec<Vec<NodeRecord>> = serde_json::from_str(json)?;
        Self::from_records(&trees, num_classes)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StructuralError> {
        let description: ForestDescription = serde_json::from_reader(reader)?;
        Self::from_description(&description)
    }

    /// Load a forest description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StructuralError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| StructuralError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading forest");
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Per-class vote counts for `features`.
    pub fn votes(&self, features: &[f32]) -> Result<Vec<u32>, BoundsError> {
        if self.num_classes == 0 {
            return Err(BoundsError::NoClasses);
        }
        if self.trees.is_empty() {
            return Err(BoundsError::EmptyForest);
        }

        let mut counts = vec![0u32; self.num_classes];
        for tree in &self.trees {
            let prediction = tree.predict(features)?;
            let slot = counts.get_mut(prediction).ok_or(BoundsError::ClassIndex {
                index: prediction,
                num_classes: self.num_classes,
            })?;
            *slot += 1;
        }
        Ok(counts)
    }

    /// Majority-vote class for `features`.
    ///
    /// On a tie the lowest class index wins.
    pub fn predict(&self, features: &[f32]) -> Result<usize, BoundsError> {
        let counts = self.votes(features)?;
        let mut predicted = 0;
        let mut max_count = counts[0];
        for (class, &count) in counts.iter().enumerate().skip(1) {
            if count > max_count {
                max_count = count;
                predicted = class;
            }
        }
        Ok(predicted)
    }
}

fn check_leaf_classes(
    tree: usize,
    built: &DecisionTree,
    records: &[NodeRecord],
    num_classes: usize,
) -> Result<(), StructuralError> {
    for (record, node) in records.iter().zip(built.nodes()) {
        if let Node::Leaf { prediction } = *node {
            if prediction >= num_classes {
                return Err(StructuralError::LeafClassOutOfRange {
                    tree,
                    node: record.node_id,
                    prediction,
                    num_classes,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_tree(class: i64) -> Vec<NodeRecord> {
        vec![NodeRecord::leaf(0, class)]
    }

    #[test]
    fn test_majority_vote() {
        let forest =
            ForestClassifier::from_records(&[constant_tree(1), constant_tree(1), constant_tree(0)], 3)
                .unwrap();
        assert_eq!(forest.votes(&[]), Ok(vec![1, 2, 0]));
        assert_eq!(forest.predict(&[]), Ok(1));
    }

    #[test]
    fn test_tie_goes_to_lowest_class() {
        let forest = ForestClassifier::from_records(
            &[constant_tree(2), constant_tree(1), constant_tree(1), constant_tree(2)],
            3,
        )
        .unwrap();
        assert_eq!(forest.predict(&[]), Ok(1));
    }

    #[test]
    fn test_empty_forest_is_error() {
        let forest = ForestClassifier::new(Vec::new(), 3);
        assert_eq!(forest.predict(&[0.0]), Err(BoundsError::EmptyForest));
    }

    #[test]
    fn test_zero_classes_is_error() {
        let tree = DecisionTree::from_records(&constant_tree(0)).unwrap();
        let forest = ForestClassifier::new(vec![tree], 0);
        assert_eq!(forest.predict(&[]), Err(BoundsError::NoClasses));
    }

    #[test]
    fn test_out_of_range_vote_at_predict() {
        let tree = DecisionTree::from_records(&constant_tree(5)).unwrap();
        let forest = ForestClassifier::new(vec![tree], 3);
        assert_eq!(
            forest.predict(&[]),
            Err(BoundsError::ClassIndex {
                index: 5,
                num_classes: 3
            })
        );
    }

    #[test]
    fn test_out_of_range_leaf_at_load() {
        let err = ForestClassifier::from_records(&[constant_tree(0), constant_tree(3)], 3)
            .unwrap_err();
        assert!(matches!(
            err,
            StructuralError::LeafClassOutOfRange {
                tree: 1,
                prediction: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "num_classes": 2,
            "trees": [
                [
                    {"node_id": 0, "is_leaf": false, "feature_index": 0, "threshold": 0.5,
                     "left_child": 1, "right_child": 2},
                    {"node_id": 1, "is_leaf": true, "prediction": 0},
                    {"node_id": 2, "is_leaf": true, "prediction": 1}
                ]
            ]
        }"#;
        let forest = ForestClassifier::from_json_str(json).unwrap();
        assert_eq!(forest.num_trees(), 1);
        assert_eq!(forest.num_classes(), 2);
        assert_eq!(forest.predict(&[0.5]), Ok(0));
        assert_eq!(forest.predict(&[0.51]), Ok(1));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ForestClassifier::from_json_str("{\"trees\": 3}"),
            Err(StructuralError::Json(_))
        ));
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForestClassifier>();
    }
}
