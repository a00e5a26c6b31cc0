use std::time::Instant;

use crate::codec;
use crate::common::{ModelConfig, PhaseTimes, RuntimeOptions, VigilFrame, VigilMask};
use crate::error::VigilError;
use crate::inference::{ExecutionBackend, SessionManager, StatusSink};

/// Per-frame person segmentation: preprocess, run, mask decode. Owns its own
/// session, independent of any detection pipeline.
pub struct SegmentationPipeline {
    config: ModelConfig,
    runtime: RuntimeOptions,
    manager: SessionManager,
    times: PhaseTimes,
}

impl SegmentationPipeline {
    pub fn new(config: ModelConfig, runtime: RuntimeOptions) -> Self {
        Self {
            config,
            runtime,
            manager: SessionManager::new(),
            times: PhaseTimes::default(),
        }
    }

    pub fn set_status_sink(&mut self, sink: StatusSink) {
        self.manager.set_status_sink(sink);
    }

    pub fn initialize(&mut self, device_index: Option<usize>) -> Result<ExecutionBackend, VigilError> {
        self.manager.initialize(&self.config, &self.runtime, device_index)
    }

    pub fn active_provider(&self) -> Option<&'static str> {
        self.manager.active_provider()
    }

    pub fn timings(&self) -> &PhaseTimes {
        &self.times
    }

    /// Produces the binary person mask for one frame. The activation map is
    /// thresholded against the configured confidence threshold.
    pub fn segment(&mut self, frame: &VigilFrame) -> Result<VigilMask, VigilError> {
        // usage error surfaces before any tensor work
        self.manager.session_mut()?;

        let started = Instant::now();
        let (tensor, plan) = codec::preprocess(
            frame,
            self.config.model_width(),
            self.config.model_height(),
            self.config.normalization.as_ref(),
        )?;
        let pre = started.elapsed();

        let session = self.manager.session_mut()?;
        let run_started = Instant::now();
        let outputs = super::run_with_retry(session, &tensor)?;
        let run = run_started.elapsed();

        let post_started = Instant::now();
        let mask = match outputs.first() {
            None => {
                log::error!("model produced no outputs; emitting an empty mask");
                VigilMask::empty(frame.width(), frame.height())
            }
            Some(output) => match codec::decode_mask(
                output,
                &plan,
                frame.width(),
                frame.height(),
                self.config.conf_threshold,
            ) {
                Ok(mask) => mask,
                Err(VigilError::DecodeShapeUnrecognized(shape)) => {
                    log::error!(
                        "segmentation output has unrecognized shape {shape:?}; emitting an empty mask"
                    );
                    VigilMask::empty(frame.width(), frame.height())
                }
                Err(err) => return Err(err),
            },
        };
        let post = post_started.elapsed();

        self.times.record(pre, run, post);
        if self.runtime.profile {
            log::info!("> Preprocess: {pre:?} | Inference: {run:?} | Postprocess: {post:?}");
        }

        Ok(mask)
    }

    /// Idempotent; the session slot empties on the first call.
    pub fn dispose(&mut self) {
        self.manager.dispose();
    }
}
