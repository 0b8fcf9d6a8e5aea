//! Integer pixel regions exchanged with the crop stage.

use serde::{Deserialize, Serialize};

use crate::geometry::RotatedRect;

/// Position of a crop origin inside the full frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: i32,
    pub y: i32,
}

impl PixelOffset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in full-frame pixel coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    #[inline]
    pub fn origin(&self) -> PixelOffset {
        PixelOffset::new(self.x, self.y)
    }

    /// Smallest pixel rectangle covering a rotated rectangle.
    pub fn bounding(rect: &RotatedRect) -> Self {
        let (min, max) = rect.bounds();
        let x0 = min.x.floor() as i32;
        let y0 = min.y.floor() as i32;
        let x1 = max.x.ceil() as i32;
        let y1 = max.y.ceil() as i32;
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Grow (or shrink) both sides by `factor` around the same center.
    pub fn scaled(&self, factor: f32) -> Self {
        let factor = factor.max(0.0);
        let cx = self.x as f32 + 0.5 * self.width as f32;
        let cy = self.y as f32 + 0.5 * self.height as f32;
        let w = (self.width as f32 * factor).round();
        let h = (self.height as f32 * factor).round();
        Self::new(
            (cx - 0.5 * w).round() as i32,
            (cy - 0.5 * h).round() as i32,
            w as i32,
            h as i32,
        )
    }

    /// Intersection with `[0, width) x [0, height)`; `None` if nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x.saturating_add(self.width)).min(width as i32);
        let y1 = (self.y.saturating_add(self.height)).min(height as i32);
        (x1 > x0 && y1 > y0).then(|| Self::new(x0, y0, x1 - x0, y1 - y0))
    }
}
