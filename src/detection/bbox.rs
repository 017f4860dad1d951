/// Decoded detection box.
///
/// Carries two representations of the same box:
/// - Pixel corners (`x1, y1, x2, y2`) scaled to the source frame
/// - Normalized center form (`cx, cy, w, h`) exactly as the model emitted it
///
/// Boxes are created by the decoder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    /// Left edge in pixels
    pub x1: f32,
    /// Top edge in pixels
    pub y1: f32,
    /// Right edge in pixels
    pub x2: f32,
    /// Bottom edge in pixels
    pub y2: f32,
    /// Normalized center x
    pub cx: f32,
    /// Normalized center y
    pub cy: f32,
    /// Normalized width
    pub w: f32,
    /// Normalized height
    pub h: f32,
    /// Maximum class score of the anchor
    pub confidence: f32,
    /// Index of the winning class
    pub class_index: usize,
    /// Label of the winning class
    pub class_name: String,
}

impl BoundingBox {
    /// Create a box from normalized center form, scaling corners to the source frame.
    #[allow(clippy::too_many_arguments)]
    pub fn from_center(
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        source_width: f32,
        source_height: f32,
        confidence: f32,
        class_index: usize,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            x1: (cx - w / 2.0) * source_width,
            y1: (cy - h / 2.0) * source_height,
            x2: (cx + w / 2.0) * source_width,
            y2: (cy + h / 2.0) * source_height,
            cx,
            cy,
            w,
            h,
            confidence,
            class_index,
            class_name: class_name.into(),
        }
    }

    /// Pixel corners as `[x1, y1, x2, y2]`.
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Area in normalized units (`w * h`).
    #[inline]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Calculate Intersection over Union (IoU) with another box.
    ///
    /// The intersection is measured on the pixel corners while each box's
    /// area comes from its normalized `w * h`. Only boxes decoded against a
    /// 1x1 source have both in the same units; otherwise the value can leave
    /// `[0, 1]`. A union that is zero or negative yields 0, so callers must
    /// use a threshold above 0 to keep such pairs apart.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}
