use serde::{Deserialize, Serialize};

use crate::common::VigilBox;
use crate::nms::Nms;

/// One decoded detection. Immutable once produced by the codec; suppression
/// and rendering only read it.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilDetection {
    pub class_id: usize,
    pub bbox: VigilBox,
    pub label: Option<String>,
    pub confidence: f32,
    pub inference_time_us: u128,
}

impl Nms for VigilDetection {
    /// Intersection over union with another detection. Degenerate unions
    /// count as no overlap.
    fn iou(&self, other: &Self) -> f32 {
        let union = self.bbox.union(&other.bbox);
        if union <= 0. {
            return 0.;
        }
        self.bbox.intersect(&other.bbox) / union
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn same_class(&self, other: &Self) -> bool {
        self.class_id == other.class_id
    }
}

impl VigilDetection {
    pub fn new(class_id: usize, bbox: VigilBox, label: Option<String>, confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            label,
            confidence,
            inference_time_us: 0,
        }
    }

    pub fn with_bbox(mut self, bbox: VigilBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }
}
