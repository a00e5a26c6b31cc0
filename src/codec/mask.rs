//! Segmentation-mask decode: activation thresholding, letterbox crop, and
//! model-space to frame-space mapping.

use ndarray::ArrayD;
use rayon::prelude::*;

use crate::codec::preprocess::LetterboxPlan;
use crate::common::VigilMask;
use crate::error::VigilError;

/// Decodes a single-channel activation map into a binary frame-sized mask.
///
/// Accepts `[H, W]`, `[1, H, W]` or `[1, 1, H, W]` activations. Pixels
/// strictly above `threshold` become 255. The vertical letterbox padding is
/// cropped away and the remaining content is sampled back onto the original
/// frame (nearest neighbour, so scales other than 1 work too).
pub fn decode_mask(
    output: &ArrayD<f32>,
    plan: &LetterboxPlan,
    orig_w: u32,
    orig_h: u32,
    threshold: f32,
) -> Result<VigilMask, VigilError> {
    let shape = output.shape().to_vec();
    let (map_h, map_w) = match shape.as_slice() {
        [h, w] => (*h, *w),
        [1, h, w] => (*h, *w),
        [1, 1, h, w] => (*h, *w),
        _ => return Err(VigilError::DecodeShapeUnrecognized(shape)),
    };
    if map_h == 0 || map_w == 0 || orig_w == 0 || orig_h == 0 {
        return Err(VigilError::DecodeShapeUnrecognized(shape));
    }

    let flat: Vec<f32> = output.iter().copied().collect();

    // activation maps usually match the model canvas; rescale if they don't
    let sx = map_w as f32 / plan.model_w as f32;
    let sy = map_h as f32 / plan.model_h as f32;
    let scale = if plan.scale > 0.0 { plan.scale } else { 1.0 };
    let (pad_x, pad_y) = (plan.pad_x as f32, plan.pad_y as f32);

    let width = orig_w as usize;
    let mut data = vec![0u8; width * orig_h as usize];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let my = ((((y as f32 + 0.5) * scale) + pad_y) * sy) as usize;
            let my = my.min(map_h - 1);
            for (x, out) in row.iter_mut().enumerate() {
                let mx = ((((x as f32 + 0.5) * scale) + pad_x) * sx) as usize;
                let mx = mx.min(map_w - 1);
                if flat[my * map_w + mx] > threshold {
                    *out = 255;
                }
            }
        });

    Ok(VigilMask::new(data, orig_w, orig_h))
}
