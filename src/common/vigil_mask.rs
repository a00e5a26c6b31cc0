use serde::{Deserialize, Serialize};

/// Binary person mask for one frame: one byte per original-frame pixel,
/// 0 or 255. Rebuilt every frame, nothing persists across frames.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilMask {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl VigilMask {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fraction of set pixels, 0.0 to 1.0.
    pub fn coverage(&self) -> f32 {
        if self.data.is_empty() {
            return 0.;
        }
        let set = self.data.iter().filter(|&&v| v != 0).count();
        set as f32 / self.data.len() as f32
    }
}
