/// Decision tree node.
///
/// Children are indices into the owning tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// Terminal node carrying a class prediction
    Leaf { prediction: usize },
    /// Split node: `features[feature_index] <= threshold` goes left, else right
    Internal {
        feature_index: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
