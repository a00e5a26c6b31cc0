//! Raw detection-tensor decode: layout sniffing, score filtering, letterbox
//! reversal.

use ndarray::{ArrayD, Axis, Ix2};
use rayon::prelude::*;

use crate::codec::preprocess::LetterboxPlan;
use crate::common::{VigilBox, VigilDetection};
use crate::error::VigilError;

/// Decodes one raw output tensor into unsuppressed detections.
///
/// The tensor must be rank 3. The larger of the two non-batch dimensions is
/// the box count and the other is the per-box vector `4 + num_classes`, so
/// both box-major `[1, boxes, attrs]` and transposed `[1, attrs, boxes]`
/// layouts decode. Candidates keep only a class scoring strictly above
/// `conf_threshold` whose class is not excluded; coordinates come back in
/// original-frame space, clamped to the frame.
pub fn decode_detections(
    output: &ArrayD<f32>,
    plan: &LetterboxPlan,
    orig_w: u32,
    orig_h: u32,
    conf_threshold: f32,
    labels: &[String],
    excluded: &[usize],
) -> Result<Vec<VigilDetection>, VigilError> {
    let shape = output.shape();
    if shape.len() != 3 {
        return Err(VigilError::DecodeShapeUnrecognized(shape.to_vec()));
    }

    let view = output
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix2>()
        .map_err(|_| VigilError::DecodeShapeUnrecognized(shape.to_vec()))?;
    // equal dims take the transposed branch, the modern export default
    let preds = if shape[1] > shape[2] {
        view.to_owned()
    } else {
        view.t().to_owned()
    };

    let num_classes = labels.len().min(preds.shape()[1].saturating_sub(4));
    if num_classes == 0 {
        return Err(VigilError::DecodeShapeUnrecognized(shape.to_vec()));
    }

    let scale = if plan.scale > 0.0 { plan.scale } else { 1.0 };
    let (pad_x, pad_y) = (plan.pad_x as f32, plan.pad_y as f32);

    let detections = preds
        .axis_iter(Axis(0))
        .into_par_iter()
        .filter_map(|row| {
            let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);

            // strict `>` keeps the first class on exact ties
            let mut class_id = 0usize;
            let mut best = f32::MIN;
            for (i, &score) in row.iter().skip(4).take(num_classes).enumerate() {
                if score > best {
                    best = score;
                    class_id = i;
                }
            }

            if best <= conf_threshold || excluded.contains(&class_id) {
                return None;
            }

            let x1 = ((cx - w / 2.0) - pad_x) / scale;
            let y1 = ((cy - h / 2.0) - pad_y) / scale;
            let x2 = ((cx + w / 2.0) - pad_x) / scale;
            let y2 = ((cy + h / 2.0) - pad_y) / scale;

            let bbox = VigilBox::default()
                .with_x1y1_x2y2(x1, y1, x2, y2)
                .clamp_to(orig_w as f32, orig_h as f32);

            Some(
                VigilDetection::default()
                    .with_bbox(bbox)
                    .with_confidence(best)
                    .with_class_id(class_id)
                    .with_label(&labels[class_id]),
            )
        })
        .collect();

    Ok(detections)
}
