mod detection;
mod segmentation;
pub mod worker;

pub use detection::DetectionPipeline;
pub use segmentation::SegmentationPipeline;

use ndarray::{Array4, ArrayD};

use crate::error::VigilError;
use crate::inference::{BackendSession, RunMode};

/// Runs the session with the quiet options on GPU backends, retrying once
/// with the defaults before surfacing the failure. Graceful degradation
/// stays within the frame; the backend is not re-selected.
fn run_with_retry(
    session: &mut BackendSession,
    input: &Array4<f32>,
) -> Result<Vec<ArrayD<f32>>, VigilError> {
    let gpu = session.backend().is_gpu();
    let first_mode = if gpu { RunMode::Quiet } else { RunMode::Default };
    match session.run(input, first_mode) {
        Ok(outputs) => Ok(outputs),
        Err(err) if gpu => {
            log::warn!("GPU inference run failed ({err}); retrying with default run options");
            session
                .run(input, RunMode::Default)
                .map_err(VigilError::InferenceRunFailed)
        }
        Err(err) => Err(VigilError::InferenceRunFailed(err)),
    }
}
