use reqwest::multipart::{Form, Part};
use shared::{DetectionResult, DepthResult, Midpoint, Stage};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::validator::SelectedImage;

/// Every variant names the stage that produced it so callers can tell a
/// detection outage apart from a depth outage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("{stage} service returned HTTP {status}")]
    RemoteService { stage: Stage, status: u16 },
    #[error("{stage} response could not be parsed: {detail}")]
    MalformedResponse { stage: Stage, detail: String },
    #[error("{stage} request failed in transit: {detail}")]
    Transport { stage: Stage, detail: String },
    #[error("{stage} request could not be encoded: {detail}")]
    Encode { stage: Stage, detail: String },
}

impl InferenceError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::RemoteService { stage, .. }
            | Self::MalformedResponse { stage, .. }
            | Self::Transport { stage, .. }
            | Self::Encode { stage, .. } => *stage,
        }
    }
}

/// Capability interface over the two remote services. The orchestrator is
/// generic over this so tests can substitute a scripted implementation.
#[allow(async_fn_in_trait)]
pub trait InferenceService {
    async fn detect(&self, image: &SelectedImage) -> Result<DetectionResult, InferenceError>;

    async fn predict_depth(
        &self,
        image: &SelectedImage,
        midpoints: &[Midpoint],
        detection_count: usize,
        image_info: &serde_json::Value,
    ) -> Result<DepthResult, InferenceError>;
}

/// `reqwest`-backed client. One attempt per call; retry policy, if any,
/// belongs to the caller.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    http: reqwest::Client,
    config: PipelineConfig,
}

impl HttpInferenceClient {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(http: reqwest::Client, config: PipelineConfig) -> Self {
        Self { http, config }
    }

    fn image_part(image: &SelectedImage, stage: Stage) -> Result<Part, InferenceError> {
        Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())
            .map_err(|err| InferenceError::Encode {
                stage,
                detail: err.to_string(),
            })
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
        stage: Stage,
    ) -> Result<T, InferenceError> {
        log::debug!("POST {url} ({stage})");

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| InferenceError::Transport {
                stage,
                detail: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::RemoteService {
                stage,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| InferenceError::MalformedResponse {
                stage,
                detail: err.to_string(),
            })
    }
}

impl InferenceService for HttpInferenceClient {
    async fn detect(&self, image: &SelectedImage) -> Result<DetectionResult, InferenceError> {
        let form = Form::new()
            .part("image", Self::image_part(image, Stage::Detect)?)
            .text("include_image", "true");

        self.post_form(&self.config.detect_endpoint(), form, Stage::Detect)
            .await
    }

    async fn predict_depth(
        &self,
        image: &SelectedImage,
        midpoints: &[Midpoint],
        detection_count: usize,
        image_info: &serde_json::Value,
    ) -> Result<DepthResult, InferenceError> {
        let fields = encode_depth_fields(midpoints, detection_count, image_info)?;
        let form = Form::new()
            .part("image", Self::image_part(image, Stage::PredictDepth)?)
            .text("midpoints", fields.midpoints)
            .text("detection_count", fields.detection_count)
            .text("image_info", fields.image_info)
            .text("include_images", "true");

        self.post_form(&self.config.depth_endpoint(), form, Stage::PredictDepth)
            .await
    }
}

/// Text fields of the depth request form. Split out of the transport path
/// so the encoding is checkable without a live server.
#[derive(Debug, Clone, PartialEq)]
struct DepthFormFields {
    midpoints: String,
    detection_count: String,
    image_info: String,
}

fn encode_depth_fields(
    midpoints: &[Midpoint],
    detection_count: usize,
    image_info: &serde_json::Value,
) -> Result<DepthFormFields, InferenceError> {
    let encode = |err: serde_json::Error| InferenceError::Encode {
        stage: Stage::PredictDepth,
        detail: err.to_string(),
    };

    Ok(DepthFormFields {
        midpoints: serde_json::to_string(midpoints).map_err(encode)?,
        detection_count: detection_count.to_string(),
        image_info: serde_json::to_string(image_info).map_err(encode)?,
    })
}
