//! Integration module for connecting inference backends with the core.
//!
//! The camera, the model runtime and the landmark extractor live outside this
//! crate. They plug in through [`TensorSource`] and [`LandmarkSource`], and the
//! pipelines return each frame's result to the caller.

mod pipeline;
mod source;

pub use pipeline::{DetectionPipeline, FrameResult, PipelineError, SignPipeline, SignPrediction};
pub use source::{LandmarkSource, TensorSource};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnBackend, BurnBackendError, BurnModel};
