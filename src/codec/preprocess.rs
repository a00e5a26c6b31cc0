//! Frame preprocessing: width-fit letterbox onto the model canvas, [0,1]
//! scaling, optional per-channel normalization, planar NCHW layout.

use anyhow::{bail, Result};
use fast_image_resize::images::Image as FirImage;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use ndarray::Array4;

use crate::common::{Normalization, VigilFrame};

/// Geometry of one letterbox pass. Decode reverses it to recover
/// original-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxPlan {
    pub model_w: u32,
    pub model_h: u32,
    pub resized_w: u32,
    pub resized_h: u32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub scale: f32,
}

/// Width-fit letterbox: the frame is scaled to the canvas width and the
/// height difference is split across top and bottom padding. Integer
/// truncation puts the odd row in the bottom pad. A frame taller than the
/// canvas after the width fit is clamped to the canvas.
pub fn plan_letterbox(frame_w: u32, frame_h: u32, model_w: u32, model_h: u32) -> LetterboxPlan {
    let scale = model_w as f32 / frame_w as f32;
    let resized_h = ((frame_h as f32 * scale).round() as u32)
        .min(model_h)
        .max(1);
    let pad_y = model_h.saturating_sub(resized_h) / 2;
    LetterboxPlan {
        model_w,
        model_h,
        resized_w: model_w,
        resized_h,
        pad_x: 0,
        pad_y,
        scale,
    }
}

/// Produces the `[1, 3, model_h, model_w]` input tensor. The padding keeps
/// the zero fill; only content pixels get the normalization profile. Alpha
/// is dropped.
pub fn preprocess(
    frame: &VigilFrame,
    model_w: u32,
    model_h: u32,
    normalization: Option<&Normalization>,
) -> Result<(Array4<f32>, LetterboxPlan)> {
    if model_w == 0 || model_h == 0 {
        bail!("model canvas {model_w}x{model_h} is degenerate");
    }
    let plan = plan_letterbox(frame.width(), frame.height(), model_w, model_h);

    let resized = resize_rgba(frame, plan.resized_w, plan.resized_h)?;

    let mut tensor = Array4::<f32>::zeros((1, 3, model_h as usize, model_w as usize));
    let (mean, std) = match normalization {
        Some(profile) => (profile.mean, profile.std),
        None => ([0.0; 3], [1.0; 3]),
    };

    let width = plan.resized_w as usize;
    for y in 0..plan.resized_h as usize {
        let row = y + plan.pad_y as usize;
        for x in 0..width {
            let px = (y * width + x) * 4;
            for c in 0..3 {
                let value = resized[px + c] as f32 / 255.0;
                tensor[[0, c, row, x]] = (value - mean[c]) / std[c];
            }
        }
    }

    Ok((tensor, plan))
}

fn resize_rgba(frame: &VigilFrame, target_w: u32, target_h: u32) -> Result<Vec<u8>> {
    if frame.width() == target_w && frame.height() == target_h {
        return Ok(frame.data().to_vec());
    }

    let src = FirImage::from_vec_u8(
        frame.width(),
        frame.height(),
        frame.data().to_vec(),
        PixelType::U8x4,
    )?;
    let mut dst = FirImage::new(target_w, target_h, PixelType::U8x4);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

    let mut resizer = Resizer::new();
    resizer.resize(&src, &mut dst, &options)?;

    Ok(dst.buffer().to_vec())
}
