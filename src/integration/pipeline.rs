//! Per-frame pipelines combining an inference source with the core.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::trace;

use crate::config::DetectorConfig;
use crate::detection::{BoundingBox, DetectionDecoder, Suppressor};
use crate::error::Error as CoreError;
use crate::forest::ForestClassifier;
use crate::labels::Labels;

use super::{LandmarkSource, TensorSource};

/// Failure of one frame: either the collaborator or the core.
#[derive(Error, Debug)]
pub enum PipelineError<E> {
    #[error("inference source failed: {0:?}")]
    Source(E),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Outcome of one detector frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameResult {
    /// No box cleared the confidence threshold.
    Empty,
    Detected {
        boxes: Vec<BoundingBox>,
        /// Inference plus decode and suppression.
        inference_time: Duration,
    },
}

/// Detector path: inference, decode, suppression.
pub struct DetectionPipeline<S: TensorSource> {
    source: S,
    decoder: DetectionDecoder,
    suppressor: Suppressor,
    num_anchors: usize,
}

impl<S: TensorSource> DetectionPipeline<S> {
    /// Create a pipeline from explicit parts.
    pub fn new(
        source: S,
        decoder: DetectionDecoder,
        suppressor: Suppressor,
        num_anchors: usize,
    ) -> Self {
        Self {
            source,
            decoder,
            suppressor,
            num_anchors,
        }
    }

    /// Create a pipeline from detector configuration.
    pub fn from_config(source: S, config: &DetectorConfig, labels: Labels) -> Self {
        Self::new(
            source,
            DetectionDecoder::new(config.num_classes, config.confidence_threshold, labels),
            Suppressor::new(config.iou_threshold),
            config.num_anchors,
        )
    }

    /// Process a single frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Source frame width in pixels
    /// * `height` - Source frame height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameResult, PipelineError<S::Error>> {
        let started = Instant::now();
        let raw = self
            .source
            .infer(input, width, height)
            .map_err(PipelineError::Source)?;
        let candidates = self
            .decoder
            .decode(&raw, self.num_anchors, width, height)
            .map_err(CoreError::from)?;
        let boxes = self.suppressor.apply(candidates);
        let inference_time = started.elapsed();

        if boxes.is_empty() {
            return Ok(FrameResult::Empty);
        }
        trace!(kept = boxes.len(), ?inference_time, "frame detected");
        Ok(FrameResult::Detected {
            boxes,
            inference_time,
        })
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn decoder(&self) -> &DetectionDecoder {
        &self.decoder
    }
}

/// Predicted hand shape for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignPrediction {
    pub class_index: usize,
    pub label: String,
}

/// Landmark path: feature extraction, then forest majority vote.
pub struct SignPipeline<S: LandmarkSource> {
    source: S,
    forest: Arc<ForestClassifier>,
    labels: Labels,
}

impl<S: LandmarkSource> SignPipeline<S> {
    pub fn new(source: S, forest: Arc<ForestClassifier>, labels: Labels) -> Self {
        Self {
            source,
            forest,
            labels,
        }
    }

    /// Classify the hand in a frame, `None` when no hand was found.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<SignPrediction>, PipelineError<S::Error>> {
        let Some(features) = self
            .source
            .landmarks(input, width, height)
            .map_err(PipelineError::Source)?
        else {
            return Ok(None);
        };
        let class_index = self.forest.predict(&features).map_err(CoreError::from)?;
        let label = self.labels.get(class_index).map_err(CoreError::from)?;
        Ok(Some(SignPrediction {
            class_index,
            label: label.to_owned(),
        }))
    }

    pub fn forest(&self) -> &Arc<ForestClassifier> {
        &self.forest
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
