//! Channel-driven detection loop for callers that feed frames from a
//! capture thread.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::common::{VigilDetection, VigilFrame};
use crate::error::VigilError;
use crate::pipeline::DetectionPipeline;

/// A pipeline shared between the worker loop and its owner. The owner keeps
/// one handle so it can dispose the session between frames.
pub type SharedPipeline = Arc<Mutex<DetectionPipeline>>;

pub fn share(pipeline: DetectionPipeline) -> SharedPipeline {
    Arc::new(Mutex::new(pipeline))
}

/// Channel pair owned by the loop: frames in, detection batches out.
pub struct DetectionChannels {
    pub frame_rx: Receiver<VigilFrame>,
    pub detections_tx: Sender<Vec<VigilDetection>>,
}

/// Builds the bounded channel pair; returns the caller's ends and the
/// loop's.
pub fn detection_channels(
    capacity: usize,
) -> (
    Sender<VigilFrame>,
    Receiver<Vec<VigilDetection>>,
    DetectionChannels,
) {
    let (frame_tx, frame_rx) = crossbeam_channel::bounded(capacity);
    let (detections_tx, detections_rx) = crossbeam_channel::bounded(capacity);
    (
        frame_tx,
        detections_rx,
        DetectionChannels {
            frame_rx,
            detections_tx,
        },
    )
}

/// Drains frames until the source hangs up. A per-frame failure is logged
/// and the frame dropped; a missing session aborts the loop since no later
/// frame can succeed.
pub fn run_detection_loop(
    pipeline: &SharedPipeline,
    channels: &DetectionChannels,
) -> Result<(), VigilError> {
    loop {
        let frame = match channels.frame_rx.recv() {
            Ok(frame) => frame,
            Err(_) => {
                log::info!("frame source closed; stopping detection loop");
                return Ok(());
            }
        };

        let result = pipeline.lock().detect(&frame);
        match result {
            Ok(detections) => {
                if channels.detections_tx.send(detections).is_err() {
                    log::info!("detection consumer hung up; stopping detection loop");
                    return Ok(());
                }
            }
            Err(VigilError::NotInitialized) => return Err(VigilError::NotInitialized),
            Err(err) => log::error!("dropping frame after detection failure: {err}"),
        }
    }
}
