//! Raw detector tensor decoding.

use ndarray::{ArrayView1, ArrayView2, Axis};
use tracing::{trace, warn};

use crate::detection::bbox::BoundingBox;
use crate::error::BoundsError;
use crate::labels::Labels;

/// Number of box parameters (`x, y, w, h`) leading each anchor record.
pub const BOX_PARAMS: usize = 4;

/// Decodes an anchor-major detection tensor into candidate boxes.
///
/// The tensor is read as `[num_anchors, 4 + num_classes]`, row-major: each
/// anchor holds a normalized center-form box followed by one score per class.
#[derive(Debug, Clone)]
pub struct DetectionDecoder {
    num_classes: usize,
    confidence_threshold: f32,
    labels: Labels,
}

impl DetectionDecoder {
    /// Create a decoder for `num_classes` scores per anchor.
    ///
    /// A label table shorter than `num_classes` is accepted with a warning;
    /// decoding fails only when an anchor actually selects an unlabeled class.
    pub fn new(num_classes: usize, confidence_threshold: f32, labels: Labels) -> Self {
        if labels.len() < num_classes {
            warn!(
                labels = labels.len(),
                classes = num_classes,
                "fewer labels than detector classes"
            );
        }
        Self {
            num_classes,
            confidence_threshold,
            labels,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Decode `raw` into every box whose best class score strictly exceeds
    /// the confidence threshold.
    ///
    /// Anchors are visited in index order. An empty result is not an error;
    /// a tensor shorter than its declared shape is.
    pub fn decode(
        &self,
        raw: &[f32],
        num_anchors: usize,
        source_width: u32,
        source_height: u32,
    ) -> Result<Vec<BoundingBox>, BoundsError> {
        decode(
            raw,
            num_anchors,
            self.num_classes,
            source_width,
            source_height,
            self.confidence_threshold,
            &self.labels,
        )
    }
}

/// Free-function form of [`DetectionDecoder::decode`].
pub fn decode(
    raw: &[f32],
    num_anchors: usize,
    num_classes: usize,
    source_width: u32,
    source_height: u32,
    confidence_threshold: f32,
    labels: &Labels,
) -> Result<Vec<BoundingBox>, BoundsError> {
    // A declared shape too large to address saturates and fails the length check.
    let stride = BOX_PARAMS.saturating_add(num_classes);
    let expected = num_anchors.saturating_mul(stride);
    let shape_error = || BoundsError::TensorShape {
        len: raw.len(),
        anchors: num_anchors,
        stride,
        expected,
    };
    if raw.len() < expected {
        return Err(shape_error());
    }
    let records = ArrayView2::from_shape((num_anchors, stride), &raw[..expected])
        .map_err(|_| shape_error())?;

    let width = source_width as f32;
    let height = source_height as f32;
    let mut boxes = Vec::new();

    for record in records.axis_iter(Axis(0)) {
        let (class_index, max_score) = best_class(record);
        if max_score <= confidence_threshold {
            continue;
        }
        let class_name = labels.get(class_index)?;
        boxes.push(BoundingBox::from_center(
            record[0],
            record[1],
            record[2],
            record[3],
            width,
            height,
            max_score,
            class_index,
            class_name,
        ));
    }

    trace!(
        anchors = num_anchors,
        candidates = boxes.len(),
        "decoded detection tensor"
    );
    Ok(boxes)
}

/// Highest class score of one anchor record and its index.
///
/// Scores must be positive to count; ties keep the lowest index.
fn best_class(record: ArrayView1<'_, f32>) -> (usize, f32) {
    let mut class_index = 0;
    let mut max_score = 0.0f32;
    for (i, &score) in record.iter().skip(BOX_PARAMS).enumerate() {
        if score > max_score {
            max_score = score;
            class_index = i;
        }
    }
    (class_index, max_score)
}
