//! Traits for the inference collaborators that feed the core.

/// Opaque inference call producing a raw detection tensor.
///
/// Implement this trait to connect any detection model to the decoder.
///
/// # Example
///
/// ```ignore
/// use asl_recog_rs::TensorSource;
///
/// struct MyInterpreter {
///     // Your model here
/// }
///
/// impl TensorSource for MyInterpreter {
///     type Error = std::io::Error;
///
///     fn infer(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<f32>, Self::Error> {
///         // Run the model and return its flattened output
///         Ok(vec![])
///     }
/// }
/// ```
pub trait TensorSource {
    /// Error type for inference failures.
    type Error;

    /// Run inference on raw image data.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    /// The output tensor flattened row-major as `[num_anchors, 4 + num_classes]`.
    fn infer(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<f32>, Self::Error>;
}

/// Hand-landmark extractor producing a classifier feature vector.
pub trait LandmarkSource {
    type Error;

    /// Extract flattened `(x, y)` landmark pairs for one frame.
    ///
    /// Returns `Ok(None)` when no hand is visible.
    fn landmarks(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<Vec<f32>>, Self::Error>;
}
