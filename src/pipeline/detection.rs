use std::time::Instant;

use crate::codec;
use crate::common::{labels, ModelConfig, PhaseTimes, RuntimeOptions, VigilDetection, VigilFrame};
use crate::error::VigilError;
use crate::inference::{ExecutionBackend, SessionManager, StatusSink};
use crate::nms;
use crate::utils;

/// Per-frame object detection: preprocess, run, decode, suppress.
///
/// One inference call at a time per instance; the owning frame loop must not
/// call `detect` again before the previous call returns.
pub struct DetectionPipeline {
    config: ModelConfig,
    runtime: RuntimeOptions,
    manager: SessionManager,
    labels: Vec<String>,
    times: PhaseTimes,
}

impl DetectionPipeline {
    pub fn new(config: ModelConfig, runtime: RuntimeOptions) -> Self {
        let labels = resolve_labels(&config);
        Self {
            config,
            runtime,
            manager: SessionManager::new(),
            labels,
            times: PhaseTimes::default(),
        }
    }

    pub fn set_status_sink(&mut self, sink: StatusSink) {
        self.manager.set_status_sink(sink);
    }

    /// Brings up the backend session, walking the fallback chain.
    /// `device_index` re-targets device-addressed backends.
    pub fn initialize(&mut self, device_index: Option<usize>) -> Result<ExecutionBackend, VigilError> {
        let backend = self.manager.initialize(&self.config, &self.runtime, device_index)?;
        self.check_metadata_names();
        Ok(backend)
    }

    fn check_metadata_names(&mut self) {
        let expected = self.labels.len();
        let Ok(session) = self.manager.session_mut() else {
            return;
        };
        if let Some(names) = session.metadata_class_names() {
            if !names.is_empty() && names.len() != expected {
                log::warn!(
                    "model metadata lists {} classes, label table has {}",
                    names.len(),
                    expected,
                );
            }
        }
    }

    pub fn active_provider(&self) -> Option<&'static str> {
        self.manager.active_provider()
    }

    pub fn timings(&self) -> &PhaseTimes {
        &self.times
    }

    /// Detects objects in one frame.
    pub fn detect(&mut self, frame: &VigilFrame) -> Result<Vec<VigilDetection>, VigilError> {
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
        let decoded = match outputs.first() {
            None => {
                log::error!("model produced no outputs; dropping frame");
                Vec::new()
            }
            Some(output) => match codec::decode_detections(
                output,
                &plan,
                frame.width(),
                frame.height(),
                self.config.conf_threshold,
                &self.labels,
                &labels::EXCLUDED_CLASS_IDS,
            ) {
                Ok(decoded) => decoded,
                Err(VigilError::DecodeShapeUnrecognized(shape)) => {
                    log::error!("detection output has unrecognized shape {shape:?}; dropping frame");
                    Vec::new()
                }
                Err(err) => return Err(err),
            },
        };

        let mut kept = nms::suppress(decoded, self.config.iou_threshold);
        let run_us = run.as_micros();
        for detection in &mut kept {
            detection.inference_time_us = run_us;
        }
        let post = post_started.elapsed();

        self.times.record(pre, run, post);
        if self.runtime.profile {
            log::info!("> Preprocess: {pre:?} | Inference: {run:?} | Postprocess: {post:?}");
        }

        Ok(kept)
    }

    /// Idempotent; the session slot empties on the first call.
    pub fn dispose(&mut self) {
        self.manager.dispose();
    }
}

fn resolve_labels(config: &ModelConfig) -> Vec<String> {
    match &config.labels_path {
        Some(path) => match utils::file_to_vec(path) {
            Ok(lines) if !lines.is_empty() => lines,
            Ok(_) => {
                log::warn!("labels file {path} is empty; using the built-in table");
                labels::default_labels()
            }
            Err(err) => {
                log::warn!("failed to read labels file {path}: {err}; using the built-in table");
                labels::default_labels()
            }
        },
        None => labels::default_labels(),
    }
}
