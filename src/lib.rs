//! ASL hand-shape recognition core.
//!
//! Two independent per-frame paths:
//! - Detector: a raw `[num_anchors, 4 + num_classes]` tensor is decoded into
//!   labeled boxes and de-duplicated with greedy NMS.
//! - Landmarks: a flattened hand-landmark vector is classified by majority
//!   vote over a random forest loaded once from JSON.

pub mod config;
pub mod detection;
pub mod error;
pub mod forest;
pub mod integration;
pub mod labels;

pub use config::{ClassifierConfig, DetectorConfig, RecognizerConfig};
pub use detection::{BoundingBox, DetectionDecoder, Suppressor, decode, suppress};
pub use error::{BoundsError, ConfigError, Error, Result, StructuralError};
pub use forest::{DecisionTree, ForestClassifier, ForestDescription, Node, NodeRecord};
pub use integration::{
    DetectionPipeline, FrameResult, LandmarkSource, PipelineError, SignPipeline, SignPrediction,
    TensorSource,
};
pub use labels::{Labels, argmax};
