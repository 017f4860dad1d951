//! Error types for forest loading, inference-time bounds checks and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a forest from its serialized description.
///
/// These only occur at load time; a forest that loaded successfully never
/// produces a structural error during `predict`.
#[derive(Error, Debug)]
pub enum StructuralError {
    /// Tree has no node with id 0.
    #[error("tree {tree}: root node (id 0) is missing")]
    MissingRoot { tree: usize },

    /// An internal node references a child id that is not in the tree.
    #[error("tree {tree}: node {node} references missing child {child}")]
    MissingChild { tree: usize, node: i64, child: i64 },

    /// Two records in the same tree share an id.
    #[error("tree {tree}: duplicate node id {node}")]
    DuplicateNode { tree: usize, node: i64 },

    /// A record lacks a field required by its leaf/internal tag.
    #[error("tree {tree}: node {node} is missing field '{field}'")]
    MissingField {
        tree: usize,
        node: i64,
        field: &'static str,
    },

    /// A field that must be a non-negative index holds a negative value.
    #[error("tree {tree}: node {node} has negative {field} ({value})")]
    NegativeIndex {
        tree: usize,
        node: i64,
        field: &'static str,
        value: i64,
    },

    /// A node is reachable from more than one parent, or from itself.
    #[error("tree {tree}: node {node} is referenced more than once")]
    SharedNode { tree: usize, node: i64 },

    /// A leaf predicts a class outside `[0, num_classes)`.
    #[error("tree {tree}: leaf {node} predicts class {prediction}, forest has {num_classes} classes")]
    LeafClassOutOfRange {
        tree: usize,
        node: i64,
        prediction: usize,
        num_classes: usize,
    },

    /// Description is not valid JSON or does not match the record schema.
    #[error("malformed forest description: {0}")]
    Json(#[from] serde_json::Error),

    /// Description could not be read.
    #[error("failed to read forest description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by index-checked access on the per-frame hot path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    /// A split node reads past the end of the feature vector.
    #[error("feature index {index} out of range for feature vector of length {len}")]
    FeatureIndex { index: usize, len: usize },

    /// A tree voted for a class outside `[0, num_classes)`.
    #[error("class index {index} out of range for {num_classes} classes")]
    ClassIndex { index: usize, num_classes: usize },

    /// The classifier was declared with zero classes.
    #[error("classifier has no classes")]
    NoClasses,

    /// The classifier holds no trees to vote.
    #[error("forest has no trees")]
    EmptyForest,

    /// The detection tensor is shorter than its declared shape.
    #[error("detection tensor has {len} values, shape [{anchors}, {stride}] needs {expected}")]
    TensorShape {
        len: usize,
        anchors: usize,
        stride: usize,
        expected: usize,
    },

    /// No label exists for a class index.
    #[error("no label for class index {index} ({len} labels loaded)")]
    Label { index: usize, len: usize },

    /// Arg-max over an empty score vector.
    #[error("score vector is empty")]
    EmptyScores,
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Label table could not be read.
    #[error("failed to read labels {path}: {source}")]
    Labels {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
