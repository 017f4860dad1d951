mod bbox;
mod decoder;
mod nms;

pub use bbox::BoundingBox;
pub use decoder::{BOX_PARAMS, DetectionDecoder, decode};
pub use nms::{Suppressor, suppress};
