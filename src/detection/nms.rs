//! Greedy non-maximum suppression.

use std::collections::VecDeque;

use tracing::trace;

use crate::detection::bbox::BoundingBox;

/// Greedy NMS with a fixed IoU threshold.
#[derive(Debug, Clone, Copy)]
pub struct Suppressor {
    pub iou_threshold: f32,
}

impl Default for Suppressor {
    fn default() -> Self {
        Self { iou_threshold: 0.5 }
    }
}

impl Suppressor {
    pub fn new(iou_threshold: f32) -> Self {
        Self { iou_threshold }
    }

    /// Run [`suppress`] with this suppressor's threshold.
    pub fn apply(&self, boxes: Vec<BoundingBox>) -> Vec<BoundingBox> {
        suppress(boxes, self.iou_threshold)
    }
}

/// Keep the highest-confidence box, drop everything overlapping it by at
/// least `iou_threshold`, and repeat on what is left.
///
/// Suppression ignores class labels: a box of one class removes an
/// overlapping box of any other class. Equal confidences keep their input
/// order. The result is in pick order, highest confidence first.
pub fn suppress(mut boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    let candidates = boxes.len();
    // sort_by is stable
    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut remaining = VecDeque::from(boxes);
    let mut selected = Vec::new();

    while let Some(best) = remaining.pop_front() {
        remaining.retain(|b| !overlaps(&best, b, iou_threshold));
        selected.push(best);
    }

    trace!(candidates, kept = selected.len(), "suppressed overlapping boxes");
    selected
}

#[inline]
fn overlaps(kept: &BoundingBox, other: &BoundingBox, iou_threshold: f32) -> bool {
    kept.iou(other) >= iou_threshold
}
