mod classifier;
mod description;
mod node;
mod tree;

pub use classifier::ForestClassifier;
pub use description::{ForestDescription, NodeRecord, ROOT_ID};
pub use node::Node;
pub use tree::DecisionTree;
