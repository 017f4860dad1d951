//! Serialized forest description and the two-pass tree builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;
use crate::forest::node::Node;
use crate::forest::tree::DecisionTree;

/// Id of the root node in every tree.
pub const ROOT_ID: i64 = 0;

/// One node as written by the training-side exporter.
///
/// Fields that only apply to one kind of node are optional; the builder
/// reports a missing one against the node's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: i64,
    pub is_leaf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_child: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_child: Option<i64>,
}

impl NodeRecord {
    pub fn leaf(node_id: i64, prediction: i64) -> Self {
        Self {
            node_id,
            is_leaf: true,
            prediction: Some(prediction),
            feature_index: None,
            threshold: None,
            left_child: None,
            right_child: None,
        }
    }

    pub fn split(
        node_id: i64,
        feature_index: i64,
        threshold: f32,
        left_child: i64,
        right_child: i64,
    ) -> Self {
        Self {
            node_id,
            is_leaf: false,
            prediction: None,
            feature_index: Some(feature_index),
            threshold: Some(threshold),
            left_child: Some(left_child),
            right_child: Some(right_child),
        }
    }
}

/// Complete forest: class count plus one record list per tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestDescription {
    pub num_classes: usize,
    pub trees: Vec<Vec<NodeRecord>>,
}

/// Node after pass 1: fields validated, children still referenced by id.
enum Unwired {
    Leaf {
        prediction: usize,
    },
    Internal {
        feature_index: usize,
        threshold: f32,
        left_id: i64,
        right_id: i64,
    },
}

impl DecisionTree {
    /// Build a tree from its node records.
    pub fn from_records(records: &[NodeRecord]) -> Result<Self, StructuralError> {
        build_tree(0, records)
    }
}

/// Two-pass build of tree number `tree`.
///
/// Pass 1 validates every record and assigns it an arena slot keyed by id.
/// Pass 2 resolves child ids to slots. The wired structure is then walked
/// from the root to reject cycles and shared children.
pub(crate) fn build_tree(
    tree: usize,
    records: &[NodeRecord],
) -> Result<DecisionTree, StructuralError> {
    let mut slots: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    let mut unwired = Vec::with_capacity(records.len());

    for record in records {
        let node = record.node_id;
        if slots.insert(node, unwired.len()).is_some() {
            return Err(StructuralError::DuplicateNode { tree, node });
        }
        let require = |value: Option<i64>, field: &'static str| -> Result<i64, StructuralError> {
            value.ok_or(StructuralError::MissingField { tree, node, field })
        };
        let index = |value: i64, field: &'static str| -> Result<usize, StructuralError> {
            usize::try_from(value).map_err(|_| StructuralError::NegativeIndex {
                tree,
                node,
                field,
                value,
            })
        };

        let entry = if record.is_leaf {
            Unwired::Leaf {
                prediction: index(require(record.prediction, "prediction")?, "prediction")?,
            }
        } else {
            Unwired::Internal {
                feature_index: index(
                    require(record.feature_index, "feature_index")?,
                    "feature_index",
                )?,
                threshold: record.threshold.ok_or(StructuralError::MissingField {
                    tree,
                    node,
                    field: "threshold",
                })?,
                left_id: require(record.left_child, "left_child")?,
                right_id: require(record.right_child, "right_child")?,
            }
        };
        unwired.push(entry);
    }

    let root = *slots
        .get(&ROOT_ID)
        .ok_or(StructuralError::MissingRoot { tree })?;

    let resolve = |node: i64, child: i64| -> Result<usize, StructuralError> {
        slots
            .get(&child)
            .copied()
            .ok_or(StructuralError::MissingChild { tree, node, child })
    };

    let nodes = unwired
        .into_iter()
        .zip(records)
        .map(|(entry, record)| {
            Ok(match entry {
                Unwired::Leaf { prediction } => Node::Leaf { prediction },
                Unwired::Internal {
                    feature_index,
                    threshold,
                    left_id,
                    right_id,
                } => Node::Internal {
                    feature_index,
                    threshold,
                    left: resolve(record.node_id, left_id)?,
                    right: resolve(record.node_id, right_id)?,
                },
            })
        })
        .collect::<Result<Vec<_>, StructuralError>>()?;

    check_acyclic(tree, &nodes, records, root)?;
    Ok(DecisionTree::from_validated(nodes, root))
}

/// Every node reachable from `root` must be entered exactly once.
fn check_acyclic(
    tree: usize,
    nodes: &[Node],
    records: &[NodeRecord],
    root: usize,
) -> Result<(), StructuralError> {
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![root];
    while let Some(slot) = stack.pop() {
        if std::mem::replace(&mut seen[slot], true) {
            return Err(StructuralError::SharedNode {
                tree,
                node: records[slot].node_id,
            });
        }
        if let Node::Internal { left, right, .. } = nodes[slot] {
            stack.push(left);
            stack.push(right);
        }
    }
    Ok(())
}
