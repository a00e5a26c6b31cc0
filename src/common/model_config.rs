use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::inference::ExecutionBackend;

/// Per-channel normalization profile, applied after the [0,1] scaling as
/// `(x - mean) / std`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

/// Caller-supplied model configuration. Read-only for the pipeline's
/// lifetime; the backend that actually came up is returned by `initialize()`
/// and recorded by the session manager, never written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_path: String,
    /// `[batch, channels, height, width]`
    pub input_shape: [usize; 4],
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub preferred_backend: Option<ExecutionBackend>,
    pub normalization: Option<Normalization>,
    /// Optional labels file, one class name per line; the built-in table is
    /// used when absent.
    pub labels_path: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            input_shape: [1, 3, 640, 640],
            conf_threshold: 0.4,
            iou_threshold: 0.45,
            preferred_backend: None,
            normalization: None,
            labels_path: None,
        }
    }
}

impl ModelConfig {
    pub fn new(model_path: &str) -> Self {
        Self {
            model_path: model_path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_input_shape(mut self, shape: [usize; 4]) -> Self {
        self.input_shape = shape;
        self
    }

    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    pub fn with_preferred_backend(mut self, backend: ExecutionBackend) -> Self {
        self.preferred_backend = Some(backend);
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    pub fn with_labels_path(mut self, path: &str) -> Self {
        self.labels_path = Some(path.to_string());
        self
    }

    pub fn model_width(&self) -> u32 {
        self.input_shape[3] as u32
    }

    pub fn model_height(&self) -> u32 {
        self.input_shape[2] as u32
    }

    pub async fn from_json_file(path: &str) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading model config {path}"))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing model config {path}"))
    }

    pub fn summary(&self) -> String {
        format!(
            "Model Path: {}\n\
            Input Shape: {:?}\n\
            Confidence Threshold: {}\n\
            IoU Threshold: {}\n\
            Preferred Backend: {:?}",
            self.model_path,
            self.input_shape,
            self.conf_threshold,
            self.iou_threshold,
            self.preferred_backend,
        )
    }
}
