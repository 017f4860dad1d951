//! Burn inference backend for the detector path.
//!
//! This module provides a `BurnBackend` that implements `TensorSource`
//! for running detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use asl_recog_rs::integration::{BurnBackend, BurnModel};
//! use burn::backend::NdArray;
//!
//! struct HandSignYolo { /* ... */ }
//!
//! impl BurnModel<NdArray> for HandSignYolo {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> burn::tensor::Tensor<NdArray, 2> {
//!         // Run inference, return [num_anchors, 4 + num_classes]
//!     }
//! }
//!
//! let backend = BurnBackend::new(HandSignYolo::load("model.bin"), Default::default());
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::TensorSource;

/// Error type for Burn inference failures.
#[derive(Error, Debug, Clone)]
pub enum BurnBackendError {
    /// Input image has invalid dimensions.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    /// Preprocessing failed.
    #[error("preprocessing error: {0}")]
    Preprocessing(String),
    /// Output tensor could not be read back.
    #[error("output error: {0}")]
    Output(String),
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Anchor-major output of shape [num_anchors, 4 + num_classes].
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640)
    }
}

/// Burn-based detector implementing `TensorSource`.
pub struct BurnBackend<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
}

impl<B: Backend, M: BurnModel<B>> BurnBackend<B, M> {
    /// Create a new Burn backend with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self { model, device }
    }

    /// Convert planar `[C, H, W]` bytes into a `[1, C, H, W]` tensor scaled to `[0, 1]`.
    ///
    /// The caller resizes frames to the model's input size beforehand.
    pub fn preprocess(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnBackendError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let plane = (height as usize).saturating_mul(channels as usize);
        let expected_len = plane.saturating_mul(width as usize);

        if input.len() != expected_len {
            let got_width = u32::try_from(input.len() / plane.max(1)).unwrap_or(u32::MAX);
            return Err(BurnBackendError::InvalidInputDimensions {
                expected: (channels, height, width),
                got: (channels, height, got_width),
            });
        }

        if height != target_h || width != target_w {
            return Err(BurnBackendError::Preprocessing(format!(
                "input size {}x{} doesn't match model size {}x{}",
                width, height, target_w, target_h
            )));
        }

        let data: Vec<f32> = input.iter().map(|&x| x as f32 / 255.0).collect();

        Ok(
            Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
                1,
                channels as usize,
                height as usize,
                width as usize,
            ]),
        )
    }
}

impl<B: Backend, M: BurnModel<B>> TensorSource for BurnBackend<B, M> {
    type Error = BurnBackendError;

    fn infer(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<f32>, Self::Error> {
        let tensor = self.preprocess(input, width, height)?;
        self.model
            .forward(tensor)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| BurnBackendError::Output(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    /// Emits one anchor whose class score is the mean input intensity.
    struct MeanIntensity;

    impl BurnModel<NdArray> for MeanIntensity {
        fn forward(&self, input: Tensor<NdArray, 4>) -> Tensor<NdArray, 2> {
            let device = input.device();
            let mean = input.mean().into_scalar();
            Tensor::from_floats([[0.5, 0.5, 0.2, 0.2, mean]], &device)
        }

        fn input_size(&self) -> (u32, u32, u32) {
            (1, 2, 2)
        }
    }

    #[test]
    fn test_infer_flattens_output() {
        let mut backend = BurnBackend::<NdArray, _>::new(MeanIntensity, Default::default());
        let raw = backend.infer(&[255, 255, 0, 0], 2, 2).unwrap();
        assert_eq!(raw.len(), 5);
        assert!((raw[4] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_infer_rejects_wrong_size() {
        let mut backend = BurnBackend::<NdArray, _>::new(MeanIntensity, Default::default());
        assert!(matches!(
            backend.infer(&[0; 3], 2, 2),
            Err(BurnBackendError::InvalidInputDimensions { .. })
        ));
        assert!(matches!(
            backend.infer(&[0; 9], 3, 3),
            Err(BurnBackendError::Preprocessing(_))
        ));
    }

    #[test]
    fn test_infer_rejects_huge_dimensions() {
        let mut backend = BurnBackend::<NdArray, _>::new(MeanIntensity, Default::default());
        match backend.infer(&[0; 4], u32::MAX, u32::MAX) {
            Err(BurnBackendError::InvalidInputDimensions { expected, got }) => {
                assert_eq!(expected, (1, u32::MAX, u32::MAX));
                assert_eq!(got, (1, u32::MAX, 0));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
