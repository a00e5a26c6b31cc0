use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VigilBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub w: f32,
    pub h: f32,
}

impl VigilBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            w: x2 - x1,
            h: y2 - y1,
        }
    }

    pub fn width(&self) -> f32 {
        self.w
    }

    pub fn height(&self) -> f32 {
        self.h
    }

    /// Returns the center x-coordinate of the bounding box.
    pub fn cx(&self) -> f32 {
        self.x1 + self.w / 2.
    }

    /// Returns the center y-coordinate of the bounding box.
    pub fn cy(&self) -> f32 {
        self.y1 + self.h / 2.
    }

    pub fn area(&self) -> f32 {
        self.h * self.w
    }

    /// Computes the intersection area between this bounding box and another.
    /// Non-overlapping boxes yield 0, never a negative area.
    pub fn intersect(&self, other: &VigilBox) -> f32 {
        let left = self.x1.max(other.x1);
        let right = self.x2.min(other.x2);
        let top = self.y1.max(other.y1);
        let bottom = self.y2.min(other.y2);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &VigilBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Checks if this bounding box completely contains `other`.
    pub fn contains(&self, other: &VigilBox) -> bool {
        self.x1 <= other.x1 && self.x2 >= other.x2 && self.y1 <= other.y1 && self.y2 >= other.y2
    }

    /// Sets the coordinates from `(x1, y1, x2, y2)` corners.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;

        self.w = x2 - x1;
        self.h = y2 - y1;
        self
    }

    /// Sets the coordinates from a top-left corner and a size.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.w = w;
        self.h = h;

        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Sets the coordinates from a center point and a size.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - (w / 2.0);
        self.y1 = cy - (h / 2.0);
        self.w = w;
        self.h = h;

        self.x2 = cx + (w / 2.0);
        self.y2 = cy + (h / 2.0);
        self
    }

    /// Clamps the corners into `[0, max_w] x [0, max_h]` and recomputes the
    /// size. Decoded boxes never extend past the frame.
    pub fn clamp_to(mut self, max_w: f32, max_h: f32) -> Self {
        self.x1 = self.x1.clamp(0., max_w);
        self.y1 = self.y1.clamp(0., max_h);
        self.x2 = self.x2.clamp(self.x1, max_w);
        self.y2 = self.y2.clamp(self.y1, max_h);

        self.w = self.x2 - self.x1;
        self.h = self.y2 - self.y1;
        self
    }

    pub fn as_xy_wh_i32(&self) -> (i32, i32, i32, i32) {
        (
            self.x1.round() as i32,
            self.y1.round() as i32,
            self.w.round() as i32,
            self.h.round() as i32,
        )
    }

    pub fn as_x1y1_x2y2_i32(&self) -> (i32, i32, i32, i32) {
        (
            self.x1.round() as i32,
            self.y1.round() as i32,
            self.x2.round() as i32,
            self.y2.round() as i32,
        )
    }
}
