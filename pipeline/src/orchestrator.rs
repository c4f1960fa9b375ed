use shared::{DetectionResult, DepthResult, Stage};
use thiserror::Error;

use crate::client::{InferenceError, InferenceService};
use crate::midpoint::derive_midpoints;
use crate::validator::{self, ImageCandidate, SelectedImage, ValidationError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no image selected")]
    NoImageSelected,
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Why a run landed in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidMediaType,
    Detection,
    Depth,
}

/// Run states. `Succeeded`, `SucceededNoObjects` and `Failed` are terminal;
/// only a new selection (or a fresh `start` on the armed image) leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Detecting,
    DerivingMidpoints,
    PredictingDepth,
    Succeeded,
    /// Detection ran and found nothing; the depth stage was skipped by
    /// design. A success, not an error.
    SucceededNoObjects,
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    SelectionAccepted,
    SelectionRejected,
    DetectRequested,
    ObjectsDetected,
    NothingDetected,
    DetectionFailed,
    MidpointsDerived,
    DepthPredicted,
    DepthFailed,
}

/// The transition function of the run state machine. Pure, so every
/// transition is checkable without a live network. Pairs outside the
/// table leave the state where it is.
fn advance(state: PipelineState, event: Event) -> PipelineState {
    use PipelineState::*;

    match (state, event) {
        (_, Event::SelectionAccepted) => Idle,
        (_, Event::SelectionRejected) => Failed(FailureReason::InvalidMediaType),
        (Idle | Succeeded | SucceededNoObjects | Failed(_), Event::DetectRequested) => Detecting,
        (Detecting, Event::ObjectsDetected) => DerivingMidpoints,
        (Detecting, Event::NothingDetected) => SucceededNoObjects,
        (Detecting, Event::DetectionFailed) => Failed(FailureReason::Detection),
        (DerivingMidpoints, Event::MidpointsDerived) => PredictingDepth,
        (PredictingDepth, Event::DepthPredicted) => Succeeded,
        (PredictingDepth, Event::DepthFailed) => Failed(FailureReason::Depth),
        (state, _) => state,
    }
}

/// Aggregate state of one end-to-end execution. Owned exclusively by the
/// orchestrator; reset whenever a new image is selected.
#[derive(Debug, Default)]
struct PipelineRun {
    image: Option<SelectedImage>,
    state: PipelineState,
    detection: Option<DetectionResult>,
    depth: Option<DepthResult>,
    error: Option<PipelineError>,
}

/// Terminal outcome of a completed run, for presentation to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Both stages completed; detection and depth results are present.
    Analyzed,
    /// Detection found nothing, so no depth request was issued.
    NoObjects,
}

/// Sequences validation, detection, midpoint derivation and depth
/// prediction for one image at a time.
///
/// `start` takes `&mut self`, so at most one run is in flight per
/// orchestrator and the two remote calls are strictly sequential: the depth
/// payload is built from the detection response.
pub struct PipelineOrchestrator<C> {
    client: C,
    run: PipelineRun,
}

impl<C> PipelineOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            run: PipelineRun::default(),
        }
    }

    /// Validates and arms a candidate image, discarding the previous run's
    /// results. On rejection the armed image and any prior results are left
    /// untouched; only the state and last error record the failure.
    pub fn select(&mut self, candidate: ImageCandidate) -> Result<(), PipelineError> {
        match validator::validate(candidate) {
            Ok(image) => {
                log::info!(
                    "selected image {} ({} bytes)",
                    image.file_name(),
                    image.size_bytes()
                );
                self.run = PipelineRun {
                    image: Some(image),
                    state: advance(self.run.state, Event::SelectionAccepted),
                    ..PipelineRun::default()
                };
                Ok(())
            }
            Err(err) => {
                let err = PipelineError::from(err);
                log::error!("image rejected: {err}");
                self.run.state = advance(self.run.state, Event::SelectionRejected);
                self.run.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn state(&self) -> PipelineState {
        self.run.state
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.run.image.as_ref()
    }

    pub fn detection_result(&self) -> Option<&DetectionResult> {
        self.run.detection.as_ref()
    }

    pub fn depth_result(&self) -> Option<&DepthResult> {
        self.run.depth.as_ref()
    }

    pub fn last_error(&self) -> Option<&PipelineError> {
        self.run.error.as_ref()
    }

    fn fail(&mut self, event: Event, err: PipelineError) -> PipelineError {
        log::error!("pipeline run failed: {err}");
        self.run.state = advance(self.run.state, event);
        self.run.error = Some(err.clone());
        err
    }
}

impl<C: InferenceService> PipelineOrchestrator<C> {
    /// Runs the armed image through both stages. Fails with
    /// `NoImageSelected`, and no state change, when nothing is armed.
    ///
    /// A depth-stage failure keeps the detection result retrievable: it is
    /// a valid partial artifact even though the run as a whole failed.
    pub async fn start(&mut self) -> Result<PipelineOutcome, PipelineError> {
        let Some(image) = self.run.image.clone() else {
            return Err(PipelineError::NoImageSelected);
        };

        self.run.detection = None;
        self.run.depth = None;
        self.run.error = None;
        self.run.state = advance(self.run.state, Event::DetectRequested);
        log::info!("running object detection on {}", image.file_name());

        let detection = match self.client.detect(&image).await {
            Ok(detection) => detection,
            Err(err) => return Err(self.fail(Event::DetectionFailed, err.into())),
        };

        // The count is advertised separately from the list; do not trust
        // them to agree.
        if detection.detection_count != detection.detections.len() {
            let err = InferenceError::MalformedResponse {
                stage: Stage::Detect,
                detail: format!(
                    "detection_count {} does not match {} detections",
                    detection.detection_count,
                    detection.detections.len()
                ),
            };
            return Err(self.fail(Event::DetectionFailed, err.into()));
        }

        let count = detection.detection_count;
        if count == 0 {
            self.run.detection = Some(detection);
            self.run.state = advance(self.run.state, Event::NothingDetected);
            log::info!("no objects detected, skipping depth prediction");
            return Ok(PipelineOutcome::NoObjects);
        }

        self.run.state = advance(self.run.state, Event::ObjectsDetected);
        let midpoints = derive_midpoints(&detection.detections);
        let image_info = detection.image_info.clone();
        self.run.detection = Some(detection);
        self.run.state = advance(self.run.state, Event::MidpointsDerived);
        log::info!("predicting depth at {count} object midpoints");

        match self
            .client
            .predict_depth(&image, &midpoints, count, &image_info)
            .await
        {
            Ok(depth) => {
                self.run.depth = Some(depth);
                self.run.state = advance(self.run.state, Event::DepthPredicted);
                log::info!("pipeline run succeeded");
                Ok(PipelineOutcome::Analyzed)
            }
            Err(err) => Err(self.fail(Event::DepthFailed, err.into())),
        }
    }
}
