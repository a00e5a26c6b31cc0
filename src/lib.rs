pub mod codec;
pub mod common;
pub mod error;
pub mod inference;
pub mod nms;
pub mod pipeline;
mod utils;

use std::time::Instant;

pub use common::{
    ModelConfig, Normalization, RuntimeOptions, VigilBox, VigilDetection, VigilFrame, VigilMask,
};
pub use error::VigilError;
pub use inference::{ExecutionBackend, SessionManager, SessionState, StatusSink};
pub use pipeline::{DetectionPipeline, SegmentationPipeline};

pub type Result<T, E = VigilError> = std::result::Result<T, E>;

/// Builds a detection pipeline and brings up its backend session.
pub fn init_detector(
    config: ModelConfig,
    runtime: RuntimeOptions,
    device_index: Option<usize>,
) -> Result<DetectionPipeline> {
    let mut pipeline = DetectionPipeline::new(config, runtime);
    let backend = pipeline.initialize(device_index)?;
    log::info!("Initialized detection pipeline on {}", backend.name());
    Ok(pipeline)
}

/// One detection pass with total wall-clock logging.
pub fn run_detection(
    pipeline: &mut DetectionPipeline,
    frame: &VigilFrame,
) -> Result<Vec<VigilDetection>> {
    let started = Instant::now();
    let detections = pipeline.detect(frame)?;
    log::debug!("Processing time: {:?}", started.elapsed());
    Ok(detections)
}
