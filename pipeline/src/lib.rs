//! Two-stage inference pipeline: object detection followed by depth
//! prediction at each detected object's bounding-box midpoint.
//!
//! The orchestrator validates a selected image, posts it to the detection
//! service, derives per-object midpoints from the returned boxes, posts
//! those to the depth service, and reconciles both results (or their
//! failures) into one terminal outcome. The two remote calls are strictly
//! sequential; the depth payload is built from the detection response.

pub mod client;
pub mod config;
pub mod midpoint;
pub mod orchestrator;
pub mod validator;

pub use client::{HttpInferenceClient, InferenceError, InferenceService};
pub use config::PipelineConfig;
pub use midpoint::derive_midpoints;
pub use orchestrator::{
    FailureReason, PipelineError, PipelineOrchestrator, PipelineOutcome, PipelineState,
};
pub use validator::{ImageCandidate, SelectedImage, ValidationError};
