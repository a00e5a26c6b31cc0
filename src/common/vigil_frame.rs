use anyhow::{bail, Result};
use image::DynamicImage;

/// A single RGBA frame handed in by the capture collaborator.
///
/// The buffer is row-major, four bytes per pixel, and validated at
/// construction so the codec can index it without bounds surprises.
#[derive(Debug, Clone)]
pub struct VigilFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl VigilFrame {
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            bail!(
                "RGBA buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            );
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
